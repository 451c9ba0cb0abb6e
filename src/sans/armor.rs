//! Conversion of armored payload text into bits.

use thiserror::Error;

use super::bits::Bits;

/// An error converting an armored payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArmorError {
    /// A character outside the armor alphabet.
    #[error("Invalid payload character ({character:#04x}) at index {index}.")]
    Character { character: u8, index: usize },
    /// More characters than the buffer can hold.
    #[error("Payload length ({length}) exceeds the buffer capacity ({capacity}).")]
    Length { length: usize, capacity: usize },
}

/// Convert an armored payload into a bit buffer holding six bits for each
/// character.
///
/// Fails on the first character outside the armor alphabet, or if the payload
/// has more than `N` characters.
pub fn decode<const N: usize>(payload: &[u8]) -> Result<Bits<N>, ArmorError> {
    if payload.len() > N {
        Err(ArmorError::Length {
            length: payload.len(),
            capacity: N,
        })?;
    }

    let mut bits = Bits::new();

    for (index, &character) in payload.iter().enumerate() {
        let symbol = symbol(character).ok_or(ArmorError::Character { character, index })?;
        bits.push(symbol);
    }

    Ok(bits)
}

/// Map an armor character to its 6-bit value, if valid.
///
/// The alphabet is `'0'..='W'` followed by `` '`'..='w' ``.
pub const fn symbol(character: u8) -> Option<u8> {
    match character {
        b'0'..=b'W' => Some(character - b'0'),
        b'`'..=b'w' => Some(character - b'`' + 40),
        _ => None,
    }
}

/// Map a 6-bit value to its armor character.
///
/// Only the low six bits of `value` are used.
pub const fn character(value: u8) -> u8 {
    let value = value & 0x3F;

    if value < 40 { value + b'0' } else { value - 40 + b'`' }
}

//! The preamble shared by all message types.

use tartan_bitfield::bitfield;

use super::{
    armor::{self, ArmorError},
    bits::{AccessError, Bits},
};

/// Number of payload bits covered by the preamble.
pub const PREAMBLE_BITS: usize = 8;

bitfield! {
    /// The first byte of every message: its type and repeat indicator.
    pub struct Preamble(u8) {
        [2..8] pub message_type: u8,
        [0..2] pub repeat: u8,
    }
}

impl Preamble {
    /// Read the preamble from the start of a bit buffer.
    pub fn read<const N: usize>(bits: &Bits<N>) -> Result<Self, AccessError> {
        let byte = bits.unsigned(0, PREAMBLE_BITS)?;
        Ok(Self(byte as u8))
    }

    /// Read the preamble from the leading characters of an armored payload,
    /// without converting the rest.
    ///
    /// Returns `None` if the payload is too short to hold a preamble.
    pub fn peek(payload: &[u8]) -> Result<Option<Self>, ArmorError> {
        let Some(head) = payload.get(..PREAMBLE_BITS.div_ceil(6)) else {
            return Ok(None);
        };

        let bits: Bits<2> = armor::decode(head)?;
        Ok(Self::read(&bits).ok())
    }
}

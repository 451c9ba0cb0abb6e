//! Layout-driven payload decoder.

use thiserror::Error;

use crate::sans::{
    SYMBOLS,
    armor::{self, ArmorError},
    bits::{AccessError, Bits},
    layout::{Field, Kind, Layout},
};

use super::FromFields;

/// Errors occurring while decoding a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// The payload bit count lies outside the legal range of its layout.
    #[error("Payload bit count ({bits}) outside the legal range ({min}..={max}).")]
    BitCount { bits: usize, min: usize, max: usize },
    /// The payload could not be converted to bits.
    #[error("Invalid payload: {0}")]
    Armor(#[from] ArmorError),
}

/// Decode a payload with a layout, publishing field values to a receiver.
///
/// `pad` is the number of trailing pad bits in the last payload character,
/// from 0 to 5. A larger pad is reported as a bad bit count.
///
/// The receiver is only written to once the bit count has been checked and
/// the payload converted; on error it is left untouched.
///
/// The layout is expected to pass [`Layout::check`]. A fixed field wider
/// than its kind allows, in a layout that does not, is reported as a bad bit
/// count without publishing any field.
///
/// This method is also re-exported as `halyard::avec::decode_payload`.
pub fn decode(
    layout: &Layout,
    payload: &str,
    pad: u8,
    o: &mut (impl FromFields + ?Sized),
) -> Result<(), Error> {
    let bits = prepare(layout, payload.as_bytes(), pad)?;
    extract(layout, &bits, o)
}

/// Check the bit count of a payload against a layout, then convert it.
pub(crate) fn prepare(layout: &Layout, payload: &[u8], pad: u8) -> Result<Bits, Error> {
    let num_bits = payload.len().saturating_mul(6).checked_sub(pad as usize);

    let bit_count = Error::BitCount {
        bits: num_bits.unwrap_or(0),
        min: layout.min_bits,
        max: layout.max_bits,
    };

    let num_bits = match num_bits {
        Some(num_bits) if pad <= 5 && layout.accepts(num_bits) => num_bits,
        _ => Err(bit_count)?,
    };

    // Unchecked layouts may hold fields beyond the smallest legal bit count.
    let fits = |field: &Field| {
        let span = field.span(num_bits);
        field.offset <= num_bits
            && span <= num_bits - field.offset
            && (field.kind == Kind::Text || span <= field.kind.max_width())
    };

    if !layout.fields.iter().all(fits) {
        Err(bit_count)?;
    }

    let mut bits: Bits<SYMBOLS> = armor::decode(payload)?;
    bits.truncate(num_bits);

    Ok(bits)
}

/// Read every field of a layout from converted bits, publishing to a
/// receiver.
pub(crate) fn extract<const N: usize>(
    layout: &Layout,
    bits: &Bits<N>,
    o: &mut (impl FromFields + ?Sized),
) -> Result<(), Error> {
    let num_bits = bits.len();

    let bit_count = |_: AccessError| Error::BitCount {
        bits: num_bits,
        min: layout.min_bits,
        max: layout.max_bits,
    };

    for (i, field) in layout.fields.iter().enumerate() {
        let (f, offset, width) = (i as u8, field.offset, field.span(num_bits));

        match field.kind {
            Kind::Unsigned => o.add_unsigned(f, bits.unsigned(offset, width).map_err(bit_count)?),
            Kind::Signed => o.add_signed(f, bits.signed(offset, width).map_err(bit_count)?),
            Kind::Flag => o.add_flag(f, bits.flag(offset).map_err(bit_count)?),
            Kind::Text => {
                let (text, _) = bits.text(offset, width).map_err(bit_count)?;
                o.add_text(f, &text);
            }
        }
    }

    o.add_trailing_bits(layout.trailing_bits(num_bits));

    Ok(())
}

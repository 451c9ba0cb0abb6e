//! Routing payloads to their layout by message type.

use thiserror::Error;

use crate::{
    messages::CATALOG,
    sans::{
        SYMBOLS,
        bits::Bits,
        header::{PREAMBLE_BITS, Preamble},
        layout::Layout,
    },
};

use super::{
    FromMessages,
    payload::{Error as PayloadError, extract, prepare},
};

/// Errors occurring while routing and decoding a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// The payload failed to decode with its layout.
    #[error(transparent)]
    Payload(#[from] PayloadError),
    /// No layout is known for the payload's message type.
    #[error("No layout for message type {0}.")]
    UnknownMessageType(u8),
}

/// Decode a payload of any cataloged message type, publishing to a receiver.
///
/// The message type is read from the preamble in the first two payload
/// characters. The payload's bit count is then checked against that type's
/// layout before the remainder is converted, as for a typed decode.
///
/// Returns the message type. Payloads for which the receiver returns no
/// message receiver are still fully checked, but their fields are not read.
///
/// This method is also re-exported as `halyard::avec::decode_messages`.
pub fn decode(payload: &str, pad: u8, o: &mut impl FromMessages) -> Result<u8, Error> {
    decode_in(CATALOG, payload, pad, o)
}

/// Decode a payload of any message type in `catalog`, publishing to a
/// receiver.
///
/// See [`decode`] for details.
pub fn decode_in(
    catalog: &[&Layout],
    payload: &str,
    pad: u8,
    o: &mut impl FromMessages,
) -> Result<u8, Error> {
    let payload = payload.as_bytes();

    let preamble = Preamble::peek(payload).map_err(PayloadError::from)?;

    let Some(preamble) = preamble else {
        return Err(Error::Payload(PayloadError::BitCount {
            bits: (payload.len() * 6).saturating_sub(pad as usize),
            min: PREAMBLE_BITS,
            max: Bits::<SYMBOLS>::CAPACITY,
        }));
    };

    let message_type = preamble.message_type();

    let layout = catalog
        .iter()
        .find(|l| l.message_type == message_type)
        .ok_or(Error::UnknownMessageType(message_type))?;

    let bits = prepare(layout, payload, pad)?;

    if let Some(o) = o.add_message(message_type) {
        extract(layout, &bits, o)?;
    }

    Ok(message_type)
}

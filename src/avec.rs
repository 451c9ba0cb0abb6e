//! Convenience interfaces for common decoding patterns.
//!
//! The functions in this module decode armored payloads, publishing field
//! values to the [`FromFields`] and [`FromMessages`] traits.
//!
//! When a record's shape is known, these traits can be derived. See the
//! [`FromFields`](macro@FromFields) and [`FromMessages`](macro@FromMessages)
//! macros for details.

pub mod dispatch;
#[cfg(feature = "std")]
pub mod dynamic;
pub mod payload;

pub use dispatch::decode as decode_messages;
pub use payload::{Error, decode as decode_payload};

use crate::sans::layout::Layout;

/// Derive [`FromMessages`] for a struct collecting decoded messages.
///
/// _Requires Cargo feature `derive`._
///
/// # Example
///
/// To collect a single message, add the `message(N)` attribute to an
/// `Option<T>` struct field, where `N` is the message type and `T` is a type
/// implementing [`FromFields`] and [`Default`]. A later message of the same
/// type overwrites an earlier one. To collect every occurrence, apply the
/// attribute to a `Vec<T>` instead.
///
/// ```
/// #[derive(Debug, Default, FromMessages)]
/// struct Broadcasts {
///     #[message(14)]
///     safety: Vec<SafetyBroadcast>,
/// }
/// ```
#[cfg(feature = "derive")]
pub use halyard_derive::FromMessages;

/// Produce message receivers for decoded payloads.
///
/// A receiver is requested only once a payload has passed its length check
/// and armor conversion, so a returned receiver always gets a complete set of
/// field values.
///
/// See the [`FromMessages`](macro@FromMessages) derive macro for an automatic
/// implementation of this trait.
pub trait FromMessages {
    /// Retrieve a receiver for a message type, if one exists.
    fn add_message(&mut self, message_type: u8) -> Option<&mut dyn FromFields>;
}

/// Derive [`FromFields`] for a struct representing a single message.
///
/// _Requires Cargo feature `derive`._
///
/// # Examples
///
/// Add the `field(N)` attribute to a struct field, where `N` is the field's
/// index in the message layout. The value is converted to the struct field's
/// type: unsigned integers, signed integers and `bool` receive numeric and
/// flag fields, and any other type receives text through `From<&str>`.
/// `Option<T>` fields are set to `Some`.
///
/// To receive the number of payload bits left after the last field, supply
/// `trailing` in place of a field index.
///
/// ```
/// #[derive(Debug, Default, FromFields)]
/// struct SafetyBroadcast {
///     #[field(2)]
///     mmsi: u32,
///     #[field(4)]
///     text: Option<Text>,
///     #[field(trailing)]
///     trailing_bits: u8,
/// }
/// ```
///
/// To decode into arbitrary types, supply an accumulator closure. The second
/// argument must be typed as one of `u64`, `i64`, `bool` or `&str`, selecting
/// the kind of field it receives.
///
/// ```
/// #[derive(Debug, Default, FromFields)]
/// struct Broadcast {
///     #[field(1, |r, v: u64| *r = Repeat::from(v))]
///     repeat: Repeat,
/// }
/// ```
#[cfg(feature = "derive")]
pub use halyard_derive::FromFields;

/// Receive field values for a message.
///
/// Fields are identified by their index in the message layout. Text fields
/// arrive with trailing filler already trimmed.
///
/// The default implementation of each method ignores received values.
///
/// See the [`FromFields`](macro@FromFields) derive macro for an automatic
/// implementation of this trait.
#[allow(unused_variables)]
pub trait FromFields {
    /// Add the number of payload bits not covered by any field.
    fn add_trailing_bits(&mut self, _: usize) {}
    /// Add an unsigned integer field.
    fn add_unsigned(&mut self, field: u8, _: u64) {}
    /// Add a two's complement integer field.
    fn add_signed(&mut self, field: u8, _: i64) {}
    /// Add a single-bit field.
    fn add_flag(&mut self, field: u8, _: bool) {}
    /// Add a text field.
    fn add_text(&mut self, field: u8, _: &str) {}
}

/// A message type with a fixed layout, decoded into `Self`.
pub trait MessageType: FromFields + Default {
    /// The layout of this message type.
    const LAYOUT: Layout;

    /// Decode a payload of this message type.
    ///
    /// The payload's message type is not checked: routing payloads to the
    /// right decoder is the caller's responsibility. See
    /// [`dispatch::decode`] for a decoder that routes by type, and reports
    /// unknown types with its own [`dispatch::Error`].
    fn decode(payload: &str, pad: u8) -> Result<Self, Error> {
        let mut message = Self::default();
        payload::decode(&Self::LAYOUT, payload, pad, &mut message)?;
        Ok(message)
    }
}

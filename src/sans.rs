//! Low-level machinery for implementing decoders.
//!
//! This module is intended for applications that need to work below the
//! message receivers of [`crate::avec`]: reading arbitrary bit fields,
//! converting armored text by hand, or declaring new message layouts.
//!
//! # Architecture
//!
//! Decoding a payload passes through three stages:
//!
//! - The [`armor`] converter maps each payload character to a 6-bit symbol,
//! producing a [`bits::Bits`] buffer holding exactly six bits per character.
//!
//! - The [`bits`] accessor reads unsigned, signed, flag and text fields at
//! arbitrary bit offsets, most significant bit first. Every access is
//! bounds checked against the populated length of the buffer.
//!
//! - A [`layout::Layout`] lists a message type's fields as `{name, offset,
//! width, kind}` entries, along with the inclusive range of legal payload bit
//! counts. Layouts are plain data, validated at compile time with
//! [`layout::Layout::check`].
//!
//! The [`header`] module reads the preamble shared by all message types, used
//! to route a payload to its layout.
//!
//! Some parts of the decoding process are not represented here and must be
//! carefully written by callers working at this level:
//!
//! - Checking the payload bit count against the layout's legal range before
//! extracting any field.
//!
//! - Removing pad bits from the populated length (see
//! [`bits::Bits::truncate`]).

pub mod armor;
pub mod bits;
pub mod header;
pub mod layout;

/// Maximum number of payload characters held by a default [`bits::Bits`]
/// buffer.
///
/// 168 characters carry 1008 bits, the largest AIS payload (five slots).
pub const SYMBOLS: usize = 168;

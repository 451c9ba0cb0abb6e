#![no_std]

//! An efficient decoder for the binary payloads of Automatic Identification
//! System (AIS) messages.
//!
//! Halyard turns an armored payload string and its pad-bit count into a typed
//! message record. Each message type is described by a declarative field
//! layout, and a single extraction routine reads any layout, so supporting a
//! new message type means adding data rather than code.
//!
//! Most users should begin with the typed messages in the [`messages`] module,
//! or with the receivers and derive macros in the [`avec`] module. The
//! underlying bit buffer, armor converter and layout tables live in [`sans`].
//!
//! Sentence framing (talker, fragment counts, checksum) is out of scope: the
//! input is the payload field of an already validated single-part sentence.
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `derive`: enable derive macros (default).
//! - `std`: enable the map-based dynamic decoder (default).

#[cfg(feature = "std")]
extern crate std;

pub mod avec;
pub mod messages;
pub mod sans;

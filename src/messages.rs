//! Typed messages and the catalog of known layouts.

pub mod safety_broadcast;

pub use safety_broadcast::SafetyBroadcast;

use crate::{
    avec::{self, FromFields, FromMessages, MessageType, dispatch::Error},
    sans::layout::Layout,
};

/// Layouts of every message type with a typed decoder, used for routing.
pub static CATALOG: &[&Layout] = &[&SafetyBroadcast::LAYOUT];

/// Find the layout of a message type.
pub fn layout(message_type: u8) -> Option<&'static Layout> {
    CATALOG
        .iter()
        .copied()
        .find(|l| l.message_type == message_type)
}

/// A message of any cataloged type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyMessage {
    SafetyBroadcast(SafetyBroadcast),
}

impl AnyMessage {
    /// Decode a payload, routing it by its message type.
    pub fn decode(payload: &str, pad: u8) -> Result<Self, Error> {
        let mut message = None;
        let message_type = avec::decode_messages(payload, pad, &mut message)?;
        message.ok_or(Error::UnknownMessageType(message_type))
    }

    pub fn message_type(&self) -> u8 {
        match self {
            Self::SafetyBroadcast(_) => SafetyBroadcast::LAYOUT.message_type,
        }
    }
}

impl FromMessages for Option<AnyMessage> {
    fn add_message(&mut self, message_type: u8) -> Option<&mut dyn FromFields> {
        match message_type {
            t if t == SafetyBroadcast::LAYOUT.message_type => {
                match self.insert(AnyMessage::SafetyBroadcast(Default::default())) {
                    AnyMessage::SafetyBroadcast(m) => Some(m),
                }
            }
            _ => None,
        }
    }
}

//! Safety related broadcast message (type 14).

use crate::{
    avec::{FromFields, MessageType},
    sans::{
        SYMBOLS,
        bits::{Bits, Text},
        layout::{Field, Layout, Width},
    },
};

const MESSAGE_TYPE: u8 = 0;
const REPEAT: u8 = 1;
const MMSI: u8 = 2;
const SPARE: u8 = 3;
const TEXT: u8 = 4;

const FIELDS: [Field; 5] = [
    Field::unsigned("message_type", 0, 6),
    Field::unsigned("repeat", 6, 2),
    Field::unsigned("mmsi", 8, 30),
    Field::unsigned("spare", 38, 2),
    Field::text("text", 40, Width::Remainder),
];

/// A broadcast of free safety-related text.
///
/// The payload carries 46 to 1008 bits: a 40-bit header followed by at least
/// one text character.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SafetyBroadcast {
    /// Always 14.
    pub message_type: u8,
    pub repeat: u8,
    /// Maritime mobile service identity of the sender.
    pub mmsi: u32,
    pub spare: u8,
    /// The broadcast text, without trailing `@` filler.
    pub text: Text,
    /// Bits left after the last whole text character, from 0 to 5.
    ///
    /// This count is informational and is not checked against `spare`.
    pub expected_spare_bits: u8,
}

impl MessageType for SafetyBroadcast {
    const LAYOUT: Layout = Layout {
        message_type: 14,
        name: "safety_broadcast",
        min_bits: 46,
        max_bits: 1008,
        fields: &FIELDS,
    };
}

const _: () = assert!(SafetyBroadcast::LAYOUT.check(Bits::<SYMBOLS>::CAPACITY).is_ok());

impl FromFields for SafetyBroadcast {
    fn add_trailing_bits(&mut self, bits: usize) {
        self.expected_spare_bits = bits as u8;
    }

    fn add_unsigned(&mut self, field: u8, value: u64) {
        match field {
            MESSAGE_TYPE => self.message_type = value as u8,
            REPEAT => self.repeat = value as u8,
            MMSI => self.mmsi = value as u32,
            SPARE => self.spare = value as u8,
            _ => {}
        }
    }

    fn add_text(&mut self, field: u8, value: &str) {
        if field == TEXT {
            self.text = Text::from(value);
        }
    }
}

//! Map-based decoder for layouts without a dedicated record type.
//!
//! _Requires Cargo feature `std`._

use std::{collections::BTreeMap, string::String};

use crate::{messages::CATALOG, sans::layout::Layout};

use super::{FromFields, FromMessages, dispatch, payload};

/// A decoded field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Unsigned(u64),
    Signed(i64),
    Flag(bool),
    Text(String),
}

/// A message decoded into field values keyed by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicMessage {
    layout: &'static Layout,
    values: BTreeMap<&'static str, Value>,
    trailing_bits: usize,
}

impl DynamicMessage {
    /// Create an empty message for a layout.
    pub fn new(layout: &'static Layout) -> Self {
        Self {
            layout,
            values: BTreeMap::new(),
            trailing_bits: 0,
        }
    }

    pub fn layout(&self) -> &'static Layout {
        self.layout
    }

    pub fn message_type(&self) -> u8 {
        self.layout.message_type
    }

    /// The value of a field, by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Field values in layout order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.layout
            .fields
            .iter()
            .filter_map(|f| Some((f.name, self.values.get(f.name)?)))
    }

    /// The number of payload bits not covered by any field.
    pub fn trailing_bits(&self) -> usize {
        self.trailing_bits
    }

    fn insert(&mut self, field: u8, value: Value) {
        if let Some(f) = self.layout.fields.get(field as usize) {
            self.values.insert(f.name, value);
        }
    }
}

impl FromFields for DynamicMessage {
    fn add_trailing_bits(&mut self, bits: usize) {
        self.trailing_bits = bits;
    }

    fn add_unsigned(&mut self, field: u8, value: u64) {
        self.insert(field, Value::Unsigned(value));
    }

    fn add_signed(&mut self, field: u8, value: i64) {
        self.insert(field, Value::Signed(value));
    }

    fn add_flag(&mut self, field: u8, value: bool) {
        self.insert(field, Value::Flag(value));
    }

    fn add_text(&mut self, field: u8, value: &str) {
        self.insert(field, Value::Text(value.into()));
    }
}

/// Decode a payload with a given layout.
///
/// The payload's message type is not checked against the layout.
pub fn decode_layout(
    layout: &'static Layout,
    payload: &str,
    pad: u8,
) -> Result<DynamicMessage, payload::Error> {
    let mut message = DynamicMessage::new(layout);
    payload::decode(layout, payload, pad, &mut message)?;
    Ok(message)
}

/// Decode a payload of any cataloged message type.
pub fn decode(payload: &str, pad: u8) -> Result<DynamicMessage, dispatch::Error> {
    decode_in(CATALOG, payload, pad)
}

/// Decode a payload of any message type in `catalog`.
pub fn decode_in(
    catalog: &[&'static Layout],
    payload: &str,
    pad: u8,
) -> Result<DynamicMessage, dispatch::Error> {
    let mut collector = Collector {
        catalog,
        message: None,
    };

    let message_type = dispatch::decode_in(catalog, payload, pad, &mut collector)?;

    collector
        .message
        .ok_or(dispatch::Error::UnknownMessageType(message_type))
}

struct Collector<'c> {
    catalog: &'c [&'static Layout],
    message: Option<DynamicMessage>,
}

impl FromMessages for Collector<'_> {
    fn add_message(&mut self, message_type: u8) -> Option<&mut dyn FromFields> {
        let layout = self
            .catalog
            .iter()
            .copied()
            .find(|l| l.message_type == message_type)?;

        Some(self.message.insert(DynamicMessage::new(layout)))
    }
}

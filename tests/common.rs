use csv::ReaderBuilder;
use halyard::{
    avec::{FromFields, MessageType},
    messages::SafetyBroadcast,
};

const PATH: &str = "fixtures/safety-broadcast.csv";

#[test]
fn decode_payload_safety_broadcast() {
    for row in rows() {
        let (payload, pad) = (row[0].as_str(), row[1].parse().unwrap());
        let mut validator = Validator::new(&row[2..]);
        halyard::avec::decode_payload(&SafetyBroadcast::LAYOUT, payload, pad, &mut validator)
            .unwrap();
        validator.finish();
    }
}

#[test]
fn decode_typed_safety_broadcast() {
    for row in rows() {
        let message = SafetyBroadcast::decode(&row[0], row[1].parse().unwrap()).unwrap();

        assert_eq!(message.message_type.to_string(), row[2]);
        assert_eq!(message.repeat.to_string(), row[3]);
        assert_eq!(message.mmsi.to_string(), row[4]);
        assert_eq!(message.spare.to_string(), row[5]);
        assert_eq!(message.text, row[6].as_str());
        assert_eq!(message.expected_spare_bits.to_string(), row[7]);
    }
}

#[test]
fn decode_messages_safety_broadcast() {
    for row in rows() {
        let mut receiver = Routed(Validator::new(&row[2..]));
        let message_type =
            halyard::avec::decode_messages(&row[0], row[1].parse().unwrap(), &mut receiver)
                .unwrap();
        assert_eq!(message_type, 14);
        receiver.0.finish();
    }
}

fn rows() -> Vec<Vec<String>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .from_path(PATH)
        .unwrap();

    reader
        .records()
        .map(|r| r.unwrap().iter().map(|f| f.to_string()).collect())
        .collect()
}

/// Checks each published value against the expected row, in layout order.
struct Validator {
    expected: Vec<String>,
    next: u8,
    trailing: Option<usize>,
}

impl Validator {
    fn new(expected: &[String]) -> Self {
        Self {
            expected: expected.to_vec(),
            next: 0,
            trailing: None,
        }
    }

    fn validate_field(&mut self, field: u8, value: String) {
        assert_eq!(field, self.next, "fields must arrive in layout order");
        assert_eq!(value, self.expected[field as usize]);
        self.next += 1;
    }

    fn finish(self) {
        let fields = self.expected.len() - 1;
        assert_eq!(self.next as usize, fields);
        assert_eq!(self.trailing.unwrap().to_string(), self.expected[fields]);
    }
}

impl FromFields for Validator {
    fn add_trailing_bits(&mut self, bits: usize) {
        assert!(self.trailing.replace(bits).is_none());
    }
    fn add_unsigned(&mut self, field: u8, value: u64) {
        self.validate_field(field, value.to_string());
    }
    fn add_signed(&mut self, field: u8, value: i64) {
        self.validate_field(field, value.to_string());
    }
    fn add_flag(&mut self, field: u8, value: bool) {
        self.validate_field(field, value.to_string());
    }
    fn add_text(&mut self, field: u8, value: &str) {
        self.validate_field(field, value.to_string());
    }
}

struct Routed(Validator);

impl halyard::avec::FromMessages for Routed {
    fn add_message(&mut self, message_type: u8) -> Option<&mut dyn FromFields> {
        assert_eq!(message_type, 14);
        Some(&mut self.0)
    }
}

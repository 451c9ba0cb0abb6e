use halyard::{
    avec::{
        FromFields, FromMessages, MessageType,
        dispatch::{self, Error},
        payload::Error as PayloadError,
    },
    messages::{AnyMessage, SafetyBroadcast},
    sans::{
        armor::ArmorError,
        layout::{Field, Layout},
    },
};

const REAL_WORLD: &str = ">5?Per18=HB1U:1@E=B0m<L";
const POSITION_REPORT: &str = "13aDo80000000000000000000000";

#[test]
fn decode_any_message() {
    let message = AnyMessage::decode(REAL_WORLD, 2).unwrap();
    assert_eq!(message.message_type(), 14);

    let AnyMessage::SafetyBroadcast(broadcast) = message;
    assert_eq!(broadcast, SafetyBroadcast::decode(REAL_WORLD, 2).unwrap());
}

#[test]
fn decode_any_message_errors() {
    assert_eq!(
        AnyMessage::decode(POSITION_REPORT, 0),
        Err(Error::UnknownMessageType(1))
    );
    assert_eq!(
        AnyMessage::decode(">5?Per", 0),
        Err(Error::Payload(PayloadError::BitCount {
            bits: 36,
            min: 46,
            max: 1008,
        }))
    );
}

#[test]
fn short_payload_has_no_preamble() {
    for (payload, pad, bits) in [("", 0, 0), (">", 0, 6), (">", 2, 4)] {
        assert_eq!(
            AnyMessage::decode(payload, pad),
            Err(Error::Payload(PayloadError::BitCount {
                bits,
                min: 8,
                max: 1008,
            }))
        );
    }
}

#[test]
fn preamble_characters_are_checked() {
    assert_eq!(
        AnyMessage::decode(">X?Per18=HB1U:1@E=B0m<L", 2),
        Err(Error::Payload(PayloadError::Armor(ArmorError::Character {
            character: b'X',
            index: 1,
        })))
    );
}

#[test]
fn error_messages() {
    assert_eq!(
        Error::UnknownMessageType(1).to_string(),
        "No layout for message type 1."
    );
    assert_eq!(
        AnyMessage::decode(">5?Per", 0).unwrap_err().to_string(),
        "Payload bit count (36) outside the legal range (46..=1008)."
    );
}

/// Counts requests without accepting any message.
#[derive(Default)]
struct Declined(usize);

impl FromMessages for Declined {
    fn add_message(&mut self, _: u8) -> Option<&mut dyn FromFields> {
        self.0 += 1;
        None
    }
}

#[test]
fn declined_messages_are_still_checked() {
    let mut declined = Declined::default();

    assert_eq!(
        halyard::avec::decode_messages(REAL_WORLD, 2, &mut declined),
        Ok(14)
    );
    assert_eq!(declined.0, 1);

    assert!(halyard::avec::decode_messages(">5?Per18=HB1U:1@E=B0m<,", 2, &mut declined).is_err());
    assert_eq!(declined.0, 1);
}

#[derive(Default)]
struct Header {
    message_type: Option<u64>,
    repeat: Option<u64>,
    trailing_bits: usize,
}

impl FromFields for Header {
    fn add_trailing_bits(&mut self, bits: usize) {
        self.trailing_bits = bits;
    }

    fn add_unsigned(&mut self, field: u8, value: u64) {
        match field {
            0 => self.message_type = Some(value),
            1 => self.repeat = Some(value),
            _ => {}
        }
    }
}

#[derive(Default)]
struct Headers(Option<Header>);

impl FromMessages for Headers {
    fn add_message(&mut self, _: u8) -> Option<&mut dyn FromFields> {
        Some(self.0.insert(Header::default()))
    }
}

static POSITION_HEADER: Layout = Layout {
    message_type: 1,
    name: "position_report_header",
    min_bits: 168,
    max_bits: 168,
    fields: &[Field::unsigned("message_type", 0, 6), Field::unsigned("repeat", 6, 2)],
};

#[test]
fn decode_with_custom_catalog() {
    let catalog = [&POSITION_HEADER];

    let mut headers = Headers::default();
    assert_eq!(
        dispatch::decode_in(&catalog, POSITION_REPORT, 0, &mut headers),
        Ok(1)
    );

    let header = headers.0.unwrap();
    assert_eq!(header.message_type, Some(1));
    assert_eq!(header.repeat, Some(0));
    assert_eq!(header.trailing_bits, 160);

    let mut headers = Headers::default();
    assert_eq!(
        dispatch::decode_in(&catalog, REAL_WORLD, 2, &mut headers),
        Err(Error::UnknownMessageType(14))
    );
    assert!(headers.0.is_none());
}

/// Six bits: the message type alone.
static TYPE_ONLY: Layout = Layout {
    message_type: 14,
    name: "type_only",
    min_bits: 6,
    max_bits: 6,
    fields: &[Field::unsigned("message_type", 0, 6)],
};

#[test]
fn layouts_shorter_than_preamble_are_not_routable() {
    let mut headers = Headers::default();

    halyard::avec::decode_payload(&TYPE_ONLY, ">", 0, &mut Header::default()).unwrap();
    assert_eq!(
        dispatch::decode_in(&[&TYPE_ONLY], ">", 0, &mut headers),
        Err(Error::Payload(PayloadError::BitCount {
            bits: 6,
            min: 8,
            max: 1008,
        }))
    );

    assert!(TYPE_ONLY.check(1008).is_err());
}

use halyard::sans::{
    SYMBOLS,
    armor::{self, ArmorError},
    bits::{AccessError, Bits, TEXT_ALPHABET},
    header::Preamble,
};

/// Pack a string of '0' and '1' characters into a buffer.
fn bits(pattern: &str) -> Bits {
    let mut bits = Bits::new();
    let pattern = pattern.as_bytes();

    for chunk in pattern.chunks(6) {
        let symbol = chunk
            .iter()
            .chain([b'0'; 6].iter())
            .take(6)
            .fold(0, |acc, b| (acc << 1) | (b - b'0'));
        bits.push(symbol);
    }

    bits.truncate(pattern.len());
    bits
}

#[test]
fn armor_alphabet() {
    for value in 0..64 {
        let character = armor::character(value);
        assert_eq!(armor::symbol(character), Some(value));
    }

    assert_eq!(armor::symbol(b'0'), Some(0));
    assert_eq!(armor::symbol(b'W'), Some(39));
    assert_eq!(armor::symbol(b'`'), Some(40));
    assert_eq!(armor::symbol(b'w'), Some(63));

    for character in [b'/', b'X', b'_', b'x', b' ', b',', b'*'] {
        assert_eq!(armor::symbol(character), None);
    }
}

#[test]
fn armor_decode_length() {
    let bits: Bits = armor::decode(b"15M67FC000G?ufbE`FepT@3n00Sa").unwrap();
    assert_eq!(bits.len(), 28 * 6);

    let long = [b'0'; SYMBOLS + 1];
    assert_eq!(
        armor::decode::<SYMBOLS>(&long).unwrap_err(),
        ArmorError::Length {
            length: SYMBOLS + 1,
            capacity: SYMBOLS,
        }
    );
}

#[test]
fn unsigned_most_significant_first() {
    let b = bits("1011001110");

    assert_eq!(b.unsigned(0, 4), Ok(0b1011));
    assert_eq!(b.unsigned(2, 5), Ok(0b11001));
    assert_eq!(b.unsigned(0, 10), Ok(0b1011001110));
    assert_eq!(b.unsigned(3, 0), Ok(0));
}

#[test]
fn unsigned_spans_symbols() {
    let b: Bits = armor::decode(b"w0w").unwrap();

    assert_eq!(b.unsigned(4, 4), Ok(0b1100));
    assert_eq!(b.unsigned(0, 18), Ok(0b111111_000000_111111));
}

#[test]
fn unsigned_full_width() {
    let b: Bits = armor::decode(&[b'w'; 11]).unwrap();
    assert_eq!(b.unsigned(2, 64), Ok(u64::MAX));
    assert_eq!(
        b.unsigned(0, 65),
        Err(AccessError::Width { width: 65, max: 64 })
    );
}

#[test]
fn signed_twos_complement() {
    let b = bits("1110");
    assert_eq!(b.signed(0, 4), Ok(-2));
    assert_eq!(b.signed(1, 3), Ok(-2));
    assert_eq!(b.signed(0, 1), Ok(-1));

    let b = bits("0111");
    assert_eq!(b.signed(0, 4), Ok(7));

    let b: Bits = armor::decode(&[b'w'; 11]).unwrap();
    assert_eq!(b.signed(0, 64), Ok(-1));
}

#[test]
fn flag() {
    let b = bits("01");
    assert_eq!(b.flag(0), Ok(false));
    assert_eq!(b.flag(1), Ok(true));
}

#[test]
fn access_beyond_populated_length() {
    let b = bits("1011001110");

    assert_eq!(
        b.unsigned(8, 3),
        Err(AccessError::OutOfRange {
            offset: 8,
            width: 3,
            len: 10,
        })
    );
    assert!(b.flag(10).is_err());
    assert!(b.unsigned(usize::MAX, 2).is_err());
}

#[test]
fn truncate_drops_pad_bits() {
    let mut b: Bits = armor::decode(b"ww").unwrap();
    b.truncate(10);

    assert_eq!(b.len(), 10);
    assert!(b.unsigned(8, 2).is_ok());
    assert!(b.unsigned(8, 3).is_err());

    b.truncate(20);
    assert_eq!(b.len(), 10);
}

#[test]
fn push_beyond_capacity_is_dropped() {
    let mut b = Bits::<2>::new();
    for symbol in [1, 2, 3] {
        b.push(symbol);
    }

    assert_eq!(b.len(), Bits::<2>::CAPACITY);
    assert_eq!(b.unsigned(0, 12), Ok(0b000001_000010));
    assert!(b.unsigned(12, 1).is_err());
}

#[test]
fn push_keeps_low_six_bits() {
    let mut b = Bits::<1>::new();
    b.push(0xFF);
    assert_eq!(b.unsigned(0, 6), Ok(63));
}

#[test]
fn text_alphabet() {
    let mut b = Bits::<64>::new();
    for value in 0..64 {
        b.push(value);
    }

    let (text, rest) = b.text(6, 63 * 6).unwrap();
    assert_eq!(text.as_bytes(), &TEXT_ALPHABET[1..]);
    assert_eq!(rest, 0);
}

#[test]
fn text_trims_trailing_filler() {
    // "HELLO@@@"
    let b: Bits = armor::decode(b"85<<?000").unwrap();

    let (text, rest) = b.text(0, 48).unwrap();
    assert_eq!(text, "HELLO");
    assert_eq!(rest, 0);

    let (again, _) = b.text(0, 48).unwrap();
    assert_eq!(text, again);
}

#[test]
fn text_reports_partial_character() {
    let b: Bits = armor::decode(b"85<<?000").unwrap();

    let (text, rest) = b.text(0, 17).unwrap();
    assert_eq!(text, "HE");
    assert_eq!(rest, 5);

    let (text, rest) = b.text(6, 12).unwrap();
    assert_eq!(text, "EL");
    assert_eq!(rest, 0);

    let (text, rest) = b.text(3, 5).unwrap();
    assert_eq!(text, "");
    assert_eq!(rest, 5);
}

#[test]
fn preamble() {
    let b: Bits = armor::decode(b">img=5H4").unwrap();
    let preamble = Preamble::read(&b).unwrap();
    assert_eq!(preamble.message_type(), 14);
    assert_eq!(preamble.repeat(), 3);

    let preamble = Preamble::peek(b"15M67FC000").unwrap().unwrap();
    assert_eq!(preamble.message_type(), 1);
    assert_eq!(preamble.repeat(), 0);

    assert!(Preamble::peek(b"1").unwrap().is_none());
    assert_eq!(
        Preamble::peek(b"1X").unwrap_err(),
        ArmorError::Character {
            character: b'X',
            index: 1,
        }
    );
}

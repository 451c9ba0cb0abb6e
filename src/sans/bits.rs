//! Bounds-checked access to the bits of a converted payload.

use core::{fmt, ops::Deref};

use bitvec::{array::BitArray, field::BitField, order::Msb0};
use thiserror::Error;
use tinyvec::ArrayVec;

use super::SYMBOLS;

/// An error reading from a bit buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The requested bits extend beyond the populated length.
    #[error("Bits {offset}..{offset}+{width} exceed the populated length ({len}).")]
    OutOfRange {
        offset: usize,
        width: usize,
        len: usize,
    },
    /// The requested width exceeds what the value type can hold.
    #[error("Field width ({width}) exceeds the maximum ({max}).")]
    Width { width: usize, max: usize },
}

/// A capacity-bounded sequence of bits, holding up to `N` 6-bit symbols.
///
/// Bits are numbered from zero at the most significant bit of the first
/// symbol. The populated length starts at six bits per symbol and may be
/// shortened to drop pad bits.
#[derive(Debug, Clone)]
pub struct Bits<const N: usize = SYMBOLS> {
    // One byte per symbol keeps the storage size expressible in `N`.
    bits: BitArray<[u8; N], Msb0>,
    symbols: usize,
    len: usize,
}

impl<const N: usize> Default for Bits<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Bits<N> {
    /// The number of bits a full buffer holds.
    pub const CAPACITY: usize = N * 6;

    /// Create an empty buffer.
    pub fn new() -> Self {
        Self {
            bits: BitArray::ZERO,
            symbols: 0,
            len: 0,
        }
    }

    /// Append a 6-bit symbol, ignoring any higher bits.
    ///
    /// Symbols pushed onto a full buffer are dropped.
    pub fn push(&mut self, symbol: u8) {
        if self.symbols == N {
            return;
        }

        let start = self.symbols * 6;
        self.bits[start..start + 6].store_be(symbol & 0x3F);
        self.symbols += 1;
        self.len = self.symbols * 6;
    }

    /// Shorten the populated length to at most `len` bits.
    pub fn truncate(&mut self, len: usize) {
        self.len = self.len.min(len);
    }

    /// The number of populated bits.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Read a `width`-bit unsigned value at `offset`, most significant bit
    /// first.
    pub fn unsigned(&self, offset: usize, width: usize) -> Result<u64, AccessError> {
        if width > 64 {
            Err(AccessError::Width { width, max: 64 })?;
        }

        let end = self.end(offset, width)?;

        // Loading an empty slice panics.
        if width == 0 {
            return Ok(0);
        }

        Ok(self.bits[offset..end].load_be::<u64>())
    }

    /// Read a `width`-bit two's complement value at `offset`.
    pub fn signed(&self, offset: usize, width: usize) -> Result<i64, AccessError> {
        let value = self.unsigned(offset, width)?;

        if width == 0 {
            return Ok(0);
        }

        let shift = 64 - width as u32;
        Ok(((value << shift) as i64) >> shift)
    }

    /// Read a single bit at `offset`.
    pub fn flag(&self, offset: usize) -> Result<bool, AccessError> {
        self.end(offset, 1)?;
        Ok(self.bits[offset])
    }

    /// Read `num_bits` bits at `offset` as 6-bit text, trimming trailing `@`
    /// filler characters.
    ///
    /// Returns the text and the number of remaining bits (`num_bits % 6`)
    /// that did not form a whole character.
    pub fn text(&self, offset: usize, num_bits: usize) -> Result<(Text, u8), AccessError> {
        let end = self.end(offset, num_bits)?;

        let count = num_bits / 6;
        if count > TEXT_CAPACITY {
            Err(AccessError::Width {
                width: num_bits,
                max: TEXT_CAPACITY * 6,
            })?;
        }

        let mut text = Text::default();
        for chunk in self.bits[offset..end - num_bits % 6].chunks_exact(6) {
            text.0.push(TEXT_ALPHABET[chunk.load_be::<u8>() as usize]);
        }

        while text.0.last() == Some(&b'@') {
            text.0.pop();
        }

        Ok((text, (num_bits % 6) as u8))
    }

    fn end(&self, offset: usize, width: usize) -> Result<usize, AccessError> {
        match offset.checked_add(width) {
            Some(end) if end <= self.len => Ok(end),
            _ => Err(AccessError::OutOfRange {
                offset,
                width,
                len: self.len,
            }),
        }
    }
}

/// The 6-bit text alphabet, indexed by symbol value.
pub const TEXT_ALPHABET: &[u8; 64] =
    b"@ABCDEFGHIJKLMNOPQRSTUVWXYZ[\\]^_ !\"#$%&'()*+,-./0123456789:;<=>?";

/// Maximum number of characters in a [`Text`] value.
pub const TEXT_CAPACITY: usize = SYMBOLS;

/// A text field decoded from the 6-bit alphabet, stored inline.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Text(ArrayVec<[u8; TEXT_CAPACITY]>);

impl Text {
    pub fn as_str(&self) -> &str {
        // Only ever holds whole UTF-8 sequences.
        core::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl Deref for Text {
    type Target = str;

    fn deref(&self) -> &str {
        self.as_str()
    }
}

/// Copies as many whole characters as fit.
impl From<&str> for Text {
    fn from(s: &str) -> Self {
        let end = s
            .char_indices()
            .map(|(i, c)| i + c.len_utf8())
            .take_while(|&end| end <= TEXT_CAPACITY)
            .last()
            .unwrap_or(0);

        let mut text = Self::default();
        text.0.extend_from_slice(&s.as_bytes()[..end]);
        text
    }
}

impl PartialEq<str> for Text {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Text {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Debug for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

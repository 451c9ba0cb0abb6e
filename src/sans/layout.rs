//! Declarative field layouts for message types.

use thiserror::Error;

use super::header::PREAMBLE_BITS;

/// The width of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    /// A fixed number of bits.
    Bits(usize),
    /// All bits from the field offset to the end of the payload, rounded down
    /// to whole characters for text fields. Only valid for the last field.
    Remainder,
}

/// How the bits of a field are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// An unsigned integer of up to 64 bits.
    Unsigned,
    /// A two's complement integer of up to 64 bits.
    Signed,
    /// A single bit.
    Flag,
    /// 6-bit characters, with trailing `@` filler trimmed.
    Text,
}

impl Kind {
    /// The widest field of this kind.
    pub const fn max_width(self) -> usize {
        match self {
            Kind::Unsigned | Kind::Signed => 64,
            Kind::Flag => 1,
            Kind::Text => usize::MAX,
        }
    }
}

/// A single field of a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub offset: usize,
    pub width: Width,
    pub kind: Kind,
}

impl Field {
    pub const fn unsigned(name: &'static str, offset: usize, width: usize) -> Self {
        let width = Width::Bits(width);
        let kind = Kind::Unsigned;
        Self { name, offset, width, kind }
    }

    pub const fn signed(name: &'static str, offset: usize, width: usize) -> Self {
        let width = Width::Bits(width);
        let kind = Kind::Signed;
        Self { name, offset, width, kind }
    }

    pub const fn flag(name: &'static str, offset: usize) -> Self {
        let width = Width::Bits(1);
        let kind = Kind::Flag;
        Self { name, offset, width, kind }
    }

    pub const fn text(name: &'static str, offset: usize, width: Width) -> Self {
        let kind = Kind::Text;
        Self { name, offset, width, kind }
    }

    /// The number of bits this field occupies in a payload of `num_bits`.
    pub const fn span(&self, num_bits: usize) -> usize {
        match (self.width, self.kind) {
            (Width::Bits(width), _) => width,
            (Width::Remainder, Kind::Text) => (num_bits.saturating_sub(self.offset) / 6) * 6,
            (Width::Remainder, _) => num_bits.saturating_sub(self.offset),
        }
    }
}

/// The fields and legal bit counts of one message type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub message_type: u8,
    pub name: &'static str,
    /// Smallest legal payload bit count, inclusive.
    pub min_bits: usize,
    /// Largest legal payload bit count, inclusive.
    pub max_bits: usize,
    /// Fields sorted by offset.
    pub fields: &'static [Field],
}

/// A structural error in a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The legal bit count range is empty.
    #[error("Empty bit count range ({min}..={max}).")]
    EmptyRange { min: usize, max: usize },
    /// The smallest legal bit count does not cover the preamble, so the
    /// payload could not be routed by message type.
    #[error("Smallest bit count ({min}) does not cover the 8-bit preamble.")]
    Preamble { min: usize },
    /// The largest legal bit count does not fit the buffer.
    #[error("Largest bit count ({max}) exceeds the buffer capacity ({capacity}).")]
    Capacity { max: usize, capacity: usize },
    /// A field starts before the previous one ends.
    #[error("Field {index} overlaps the field before it.")]
    Overlap { index: usize },
    /// A fixed field ends beyond the smallest legal bit count.
    #[error("Field {index} extends beyond the smallest legal bit count.")]
    Beyond { index: usize },
    /// A field width is zero, or too large for its kind.
    #[error("Field {index} has an invalid width.")]
    Width { index: usize },
    /// A remainder field is not the last field.
    #[error("Remainder field {index} is not the last field.")]
    Remainder { index: usize },
}

impl Layout {
    /// Check that fields are sorted and non-overlapping, fit every legal
    /// payload, and that the legal range covers the preamble and fits a
    /// buffer of `capacity` bits.
    ///
    /// Shipped layouts are checked at compile time:
    ///
    /// ```
    /// const _: () = assert!(LAYOUT.check(Bits::<SYMBOLS>::CAPACITY).is_ok());
    /// ```
    pub const fn check(&self, capacity: usize) -> Result<(), LayoutError> {
        if self.min_bits > self.max_bits {
            return Err(LayoutError::EmptyRange {
                min: self.min_bits,
                max: self.max_bits,
            });
        }

        if self.min_bits < PREAMBLE_BITS {
            return Err(LayoutError::Preamble { min: self.min_bits });
        }

        if self.max_bits > capacity {
            return Err(LayoutError::Capacity {
                max: self.max_bits,
                capacity,
            });
        }

        let mut end = 0;
        let mut index = 0;

        while index < self.fields.len() {
            let field = &self.fields[index];

            if field.offset < end {
                return Err(LayoutError::Overlap { index });
            }

            match field.width {
                Width::Bits(width) => {
                    if width == 0 || width > field.kind.max_width() {
                        return Err(LayoutError::Width { index });
                    }

                    end = match field.offset.checked_add(width) {
                        Some(end) if end <= self.min_bits => end,
                        _ => return Err(LayoutError::Beyond { index }),
                    };
                }
                Width::Remainder => {
                    if index + 1 != self.fields.len() {
                        return Err(LayoutError::Remainder { index });
                    }

                    if field.offset > self.min_bits {
                        return Err(LayoutError::Beyond { index });
                    }

                    if self.max_bits - field.offset > field.kind.max_width() {
                        return Err(LayoutError::Width { index });
                    }
                }
            }

            index += 1;
        }

        Ok(())
    }

    /// Whether `num_bits` lies within the legal range.
    pub const fn accepts(&self, num_bits: usize) -> bool {
        self.min_bits <= num_bits && num_bits <= self.max_bits
    }

    /// The number of bits in a payload of `num_bits` not covered by any
    /// field.
    pub const fn trailing_bits(&self, num_bits: usize) -> usize {
        match self.fields.last() {
            Some(field) => num_bits.saturating_sub(field.offset + field.span(num_bits)),
            None => num_bits,
        }
    }
}

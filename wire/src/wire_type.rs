//! Wire types and field tags.
//!
//! A tag is written before every field as the varint `field_number << 3 | wire_type`.

use crate::Error;

const WIRE_TYPE_BITS: u32 = 3;
const WIRE_TYPE_MASK: u64 = (1 << WIRE_TYPE_BITS) - 1;

/// How a field's value is framed on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WireType {
    Varint = 0,
    Fixed64 = 1,
    LengthDelimited = 2,
    StartGroup = 3,
    EndGroup = 4,
    Fixed32 = 5,
}

impl TryFrom<u8> for WireType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Varint),
            1 => Ok(Self::Fixed64),
            2 => Ok(Self::LengthDelimited),
            3 => Ok(Self::StartGroup),
            4 => Ok(Self::EndGroup),
            5 => Ok(Self::Fixed32),
            other => Err(Error::UnknownWireType(other)),
        }
    }
}

/// A field number paired with the wire type of its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag {
    pub field: u64,
    pub wire_type: WireType,
}

impl Tag {
    pub fn new(field: u64, wire_type: WireType) -> Self {
        Self { field, wire_type }
    }

    /// Packs the tag into the integer written on the wire.
    ///
    /// Field numbers above `u64::MAX >> 3` lose their high bits.
    pub fn to_raw(self) -> u64 {
        (self.field << WIRE_TYPE_BITS) | self.wire_type as u64
    }

    /// Splits a decoded tag integer into its field number and wire type.
    pub fn from_raw(raw: u64) -> Result<Self, Error> {
        let wire_type = WireType::try_from((raw & WIRE_TYPE_MASK) as u8)?;
        Ok(Self {
            field: raw >> WIRE_TYPE_BITS,
            wire_type,
        })
    }

    /// Checks that the tag carries the wire type a field was declared with.
    ///
    /// Intended for message implementations dispatching on their own fields (e.g. oneof members).
    pub fn expect(self, expected: WireType) -> Result<(), Error> {
        if self.wire_type != expected {
            return Err(Error::BadWireType {
                field: self.field,
                expected,
                found: self.wire_type,
            });
        }
        Ok(())
    }
}

//! ZigZag mapping between signed and unsigned integers.
//!
//! The sign bit moves to the least significant bit (shifting all other bits to the left by one),
//! so numbers close to zero stay short under varint encoding even when negative:
//! `0 -> 0, -1 -> 1, 1 -> 2, -2 -> 3, ...`.

/// A signed integer with a ZigZag mapping onto its unsigned equivalent.
pub trait ZigZag: Copy {
    /// The unsigned integer of the same width.
    type Unsigned: Copy;

    /// Converts the signed integer to an unsigned integer using ZigZag encoding.
    fn zigzag(self) -> Self::Unsigned;

    /// Converts a (ZigZag'ed) unsigned integer back to a signed integer.
    fn unzigzag(value: Self::Unsigned) -> Self;
}

// Implements the `ZigZag` trait for a signed integer type.
macro_rules! impl_zigzag {
    ($type:ty, $utype:ty) => {
        impl ZigZag for $type {
            type Unsigned = $utype;

            #[inline]
            fn zigzag(self) -> $utype {
                // Arithmetic shift smears the sign bit across the whole word.
                let shr = <$type>::BITS - 1;
                ((self << 1) ^ (self >> shr)) as $utype
            }

            #[inline]
            fn unzigzag(value: $utype) -> Self {
                ((value >> 1) as $type) ^ (-((value & 1) as $type))
            }
        }
    };
}
impl_zigzag!(i32, u32);
impl_zigzag!(i64, u64);

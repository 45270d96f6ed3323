//! Fixed-width little-endian integers.
//!
//! Used for the `Fixed32` and `Fixed64` wire types: 4 or 8 raw bytes, least-significant byte
//! first, no compression.

use crate::Error;
use bytes::{Buf, BufMut};
use paste::paste;

macro_rules! impl_fixed {
    ($type:ty, $bits:literal) => {
        paste! {
            #[doc = concat!("Writes a ", stringify!($bits), "-bit integer in little-endian order.")]
            #[inline]
            pub fn [<write $bits>](value: $type, buf: &mut impl BufMut) {
                buf.[<put_ $type _le>](value);
            }

            #[doc = concat!("Reads a little-endian ", stringify!($bits), "-bit integer from the front of `buf`.")]
            #[inline]
            pub fn [<read $bits>](buf: &[u8]) -> Result<$type, Error> {
                let mut chunk = buf
                    .get(..std::mem::size_of::<$type>())
                    .ok_or(Error::UnexpectedEof)?;
                Ok(chunk.[<get_ $type _le>]())
            }
        }
    };
}

impl_fixed!(u32, 32);
impl_fixed!(u64, 64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endianness() {
        let mut buf = Vec::new();
        write32(0x01020304, &mut buf);
        assert_eq!(buf, vec![0x04, 0x03, 0x02, 0x01]);

        let mut buf = Vec::new();
        write64(0x0102030405060708, &mut buf);
        assert_eq!(buf, vec![0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01]);
    }

    #[test]
    fn test_read() {
        assert_eq!(read32(&[0x04, 0x03, 0x02, 0x01, 0xFF]).unwrap(), 0x01020304);
        assert_eq!(read64(&[0xFF; 8]).unwrap(), u64::MAX);
    }

    #[test]
    fn test_short_read() {
        assert!(matches!(read32(&[0x01, 0x02, 0x03]), Err(Error::UnexpectedEof)));
        assert!(matches!(read64(&[0x01; 7]), Err(Error::UnexpectedEof)));
        assert!(matches!(read32(&[]), Err(Error::UnexpectedEof)));
    }
}

//! Variable-length integer encoding and decoding
//!
//! Each byte uses:
//! - 7 bits for the value
//! - 1 "continuation" bit to indicate if more bytes follow
//!
//! Groups are written least-significant first, so a `u64` occupies between 1 and [MAX_LEN]
//! bytes.
//!
//! Two decoders back the stream: a byte-at-a-time loop that is safe for any input length and an
//! unrolled sequence that may only run when [MAX_LEN] bytes are known to be available. Both must
//! agree on every input. [decode_slice] is a separate, relaxed entry point that folds every
//! failure into `(0, 0)`.

use crate::Error;
use bytes::BufMut;

const DATA_BITS_PER_BYTE: usize = 7;
const DATA_BITS_MASK: u8 = 0x7F;
const CONTINUATION_BIT_MASK: u8 = 0x80;

/// The maximum number of bytes occupied by an encoded `u64`.
pub const MAX_LEN: usize = 10;

/// Encodes an unsigned 64-bit integer as a varint.
pub fn write(value: u64, buf: &mut impl BufMut) {
    let continuation_threshold = u64::from(CONTINUATION_BIT_MASK);
    if value < continuation_threshold {
        // Fast path for small values (common case for tags and lengths).
        buf.put_u8(value as u8);
        return;
    }

    let mut val = value;
    while val >= continuation_threshold {
        buf.put_u8((val as u8) | CONTINUATION_BIT_MASK);
        val >>= DATA_BITS_PER_BYTE;
    }
    buf.put_u8(val as u8);
}

/// Calculates the number of bytes needed to encode an unsigned integer as a varint.
pub fn size(value: u64) -> usize {
    let data_bits = u64::BITS as usize - value.leading_zeros() as usize;
    usize::max(1, data_bits.div_ceil(DATA_BITS_PER_BYTE))
}

/// Decodes a varint from the front of `buf`, returning the value and the number of bytes consumed.
///
/// Truncated and overlong input are not distinguished: both yield `(0, 0)`. Use
/// [crate::ByteStream::decode_varint] when the cause of a failure matters.
pub fn decode_slice(buf: &[u8]) -> (u64, usize) {
    read_loop(buf).unwrap_or((0, 0))
}

/// Decodes a varint from the front of `buf`, picking the unrolled decoder when at least
/// [MAX_LEN] bytes are available.
pub fn read(buf: &[u8]) -> Result<(u64, usize), Error> {
    match buf.first() {
        None => Err(Error::UnexpectedEof),
        Some(&byte) if byte & CONTINUATION_BIT_MASK == 0 => Ok((u64::from(byte), 1)),
        Some(_) => match buf.first_chunk::<MAX_LEN>() {
            Some(chunk) => read_unrolled(chunk),
            None => read_loop(buf),
        },
    }
}

/// Decodes a varint one byte at a time.
pub(crate) fn read_loop(buf: &[u8]) -> Result<(u64, usize), Error> {
    let mut result = 0u64;
    let shifts = (0..u64::BITS as usize).step_by(DATA_BITS_PER_BYTE);
    for (index, shift) in shifts.enumerate() {
        let Some(&byte) = buf.get(index) else {
            return Err(Error::UnexpectedEof);
        };

        // On the tenth byte, only the lowest data bit lands inside the result.
        result |= u64::from(byte & DATA_BITS_MASK) << shift;
        if byte & CONTINUATION_BIT_MASK == 0 {
            return Ok((result, index + 1));
        }
    }
    Err(Error::Overflow)
}

/// Decodes a varint from exactly [MAX_LEN] available bytes without bounds checks per byte.
pub(crate) fn read_unrolled(buf: &[u8; MAX_LEN]) -> Result<(u64, usize), Error> {
    let mut result = 0u64;

    macro_rules! step {
        ($index:literal) => {
            let byte = buf[$index];
            result |= u64::from(byte & DATA_BITS_MASK) << (DATA_BITS_PER_BYTE * $index);
            if byte & CONTINUATION_BIT_MASK == 0 {
                return Ok((result, $index + 1));
            }
        };
    }

    step!(0);
    step!(1);
    step!(2);
    step!(3);
    step!(4);
    step!(5);
    step!(6);
    step!(7);
    step!(8);
    step!(9);
    Err(Error::Overflow)
}

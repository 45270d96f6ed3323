//! Human-readable trace of encoded data, for debugging.
//!
//! Each line shows the offset of a field, its field number, and its decoded value. Groups are
//! indented. Output stops at the first field that cannot be decoded.

use crate::{ByteStream, WireType};
use std::fmt;

/// Number of leading and trailing bytes shown for long length-delimited values.
const BYTES_SHOWN: usize = 3;

/// Displays `buf` as a field-by-field trace under a `title` header.
pub struct Dump<'a> {
    title: &'a str,
    buf: &'a [u8],
}

impl<'a> Dump<'a> {
    pub fn new(title: &'a str, buf: &'a [u8]) -> Self {
        Self { title, buf }
    }
}

impl fmt::Display for Dump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stream = ByteStream::from_slice(self.buf);
        let mut depth = 0i64;

        writeln!(f)?;
        writeln!(f, "--- {} ---", self.title)?;
        loop {
            for _ in 0..depth {
                write!(f, "  ")?;
            }

            let index = stream.position();
            if stream.is_exhausted() {
                break;
            }

            let op = match stream.decode_varint() {
                Ok(op) => op,
                Err(err) => {
                    writeln!(f, "{index:3}: fetching op err {err}")?;
                    break;
                }
            };
            let field = op >> 3;
            let wire = (op & 7) as u8;

            let Ok(wire_type) = WireType::try_from(wire) else {
                writeln!(f, "{index:3}: t={field:3} unknown wire={wire}")?;
                break;
            };
            match wire_type {
                WireType::LengthDelimited => {
                    let Ok(bytes) = stream.decode_raw_bytes() else {
                        break;
                    };
                    write!(f, "{index:3}: t={field:3} bytes [{}]", bytes.len())?;
                    if bytes.len() <= 2 * BYTES_SHOWN {
                        for byte in bytes {
                            write!(f, " {byte:02x}")?;
                        }
                    } else {
                        for byte in &bytes[..BYTES_SHOWN] {
                            write!(f, " {byte:02x}")?;
                        }
                        write!(f, " ..")?;
                        for byte in &bytes[bytes.len() - BYTES_SHOWN..] {
                            write!(f, " {byte:02x}")?;
                        }
                    }
                    writeln!(f)?;
                }
                WireType::Fixed32 => match stream.decode_fixed32() {
                    Ok(value) => writeln!(f, "{index:3}: t={field:3} fix32 {value}")?,
                    Err(err) => {
                        writeln!(f, "{index:3}: t={field:3} fix32 err {err}")?;
                        break;
                    }
                },
                WireType::Fixed64 => match stream.decode_fixed64() {
                    Ok(value) => writeln!(f, "{index:3}: t={field:3} fix64 {value}")?,
                    Err(err) => {
                        writeln!(f, "{index:3}: t={field:3} fix64 err {err}")?;
                        break;
                    }
                },
                WireType::Varint => match stream.decode_varint() {
                    Ok(value) => writeln!(f, "{index:3}: t={field:3} varint {value}")?,
                    Err(err) => {
                        writeln!(f, "{index:3}: t={field:3} varint err {err}")?;
                        break;
                    }
                },
                WireType::StartGroup => {
                    writeln!(f, "{index:3}: t={field:3} start")?;
                    depth += 1;
                }
                WireType::EndGroup => {
                    depth -= 1;
                    writeln!(f, "{index:3}: t={field:3} end")?;
                }
            }
        }

        if depth != 0 {
            writeln!(
                f,
                "{:3}: start-end not balanced {depth}",
                stream.position()
            )?;
        }
        writeln!(f)
    }
}

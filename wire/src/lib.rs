//! Encode and decode the tag-length-value wire format.
//!
//! # Overview
//!
//! Messages are sequences of fields. Each field starts with a varint tag packing the field
//! number and a [WireType], followed by a payload whose shape the wire type determines:
//! - [WireType::Varint]: a base-128 varint (optionally [ZigZag]-mapped for signed values)
//! - [WireType::Fixed64] / [WireType::Fixed32]: little-endian fixed-width integers
//! - [WireType::LengthDelimited]: a varint length followed by that many bytes (strings, bytes,
//!   and embedded messages)
//! - [WireType::StartGroup] / [WireType::EndGroup]: tag-delimited legacy groups
//!
//! [ByteStream] appends encoded values to, and consumes them from, a single buffer. Decoding
//! never reads past the end of the buffer: truncated or overlong input returns an [Error].
//!
//! # Messages
//!
//! A [Message] exposes one of two self-serializing capabilities, [Flat] or [Legacy]. Messages
//! exposing neither are encoded by the [Fallback] set in the stream's [Config].
//!
//! # Example
//!
//! ```
//! use bytes::BytesMut;
//! use commonware_wire::{varint, ByteStream, Error, Flat, Message, Tag, WireType, ZigZag};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Point {
//!     x: u64,
//!     y: i64,
//! }
//!
//! impl Flat for Point {
//!     fn size(&self) -> usize {
//!         2 + varint::size(self.x) + varint::size(self.y.zigzag())
//!     }
//!
//!     fn marshal_into(&self, buf: &mut BytesMut, _: bool) -> Result<(), Error> {
//!         varint::write(Tag::new(1, WireType::Varint).to_raw(), buf);
//!         varint::write(self.x, buf);
//!         varint::write(Tag::new(2, WireType::Varint).to_raw(), buf);
//!         varint::write(self.y.zigzag(), buf);
//!         Ok(())
//!     }
//!
//!     fn unmarshal_from(&mut self, buf: &[u8]) -> Result<(), Error> {
//!         let mut stream = ByteStream::from_slice(buf);
//!         while !stream.is_exhausted() {
//!             let tag = stream.decode_tag()?;
//!             tag.expect(WireType::Varint)?;
//!             match tag.field {
//!                 1 => self.x = stream.decode_varint()?,
//!                 _ => self.y = stream.decode_zigzag64()?,
//!             }
//!         }
//!         Ok(())
//!     }
//! }
//!
//! impl Message for Point {
//!     fn reset(&mut self) {
//!         *self = Self::default();
//!     }
//!
//!     fn as_flat(&self) -> Option<&dyn Flat> {
//!         Some(self)
//!     }
//!
//!     fn as_flat_mut(&mut self) -> Option<&mut dyn Flat> {
//!         Some(self)
//!     }
//! }
//!
//! // Embed the point as a length-delimited field
//! let point = Point { x: 3, y: -2 };
//! let mut stream = ByteStream::new();
//! stream.encode_tag(Tag::new(7, WireType::LengthDelimited));
//! stream.encode_message(&point).unwrap();
//!
//! // Decode it back
//! let mut stream = ByteStream::from_slice(stream.content());
//! assert_eq!(stream.decode_tag().unwrap(), Tag::new(7, WireType::LengthDelimited));
//! let mut decoded = Point::default();
//! stream.decode_message(&mut decoded).unwrap();
//! assert_eq!(decoded, point);
//! assert!(stream.is_exhausted());
//! ```

#![doc(
    html_logo_url = "https://commonware.xyz/imgs/rustdoc_logo.svg",
    html_favicon_url = "https://commonware.xyz/favicon.ico"
)]

pub mod config;
mod dispatch;
mod dump;
pub mod error;
pub mod fixed;
mod group;
pub mod message;
mod stream;
pub mod varint;
mod wire_type;
pub mod zigzag;

#[cfg(test)]
mod mocks;

// Re-export main types and traits
pub use config::{Config, RangeCfg};
pub use dispatch::{
    marshal, marshal_with, unmarshal, unmarshal_merge, unmarshal_merge_with, unmarshal_with,
};
pub use dump::Dump;
pub use error::Error;
pub use group::FindEndGroup;
pub use message::{Capability, Fallback, Flat, Legacy, Message};
pub use stream::ByteStream;
pub use wire_type::{Tag, WireType};
pub use zigzag::ZigZag;

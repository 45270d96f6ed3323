//! A reusable buffer with a read cursor.
//!
//! Encoding appends to the content; decoding consumes from the cursor. A stream is not meant to
//! be shared: every operation takes `&mut self`, so concurrent callers need one stream each or
//! external locking.

use crate::{dispatch, fixed, varint, zigzag::ZigZag, Config, Error, Message, Tag};
use bytes::{Bytes, BytesMut};
use std::ops::Range;
use tracing::debug;

/// Buffer and cursor for encoding and decoding the wire format.
#[derive(Debug, Default)]
pub struct ByteStream {
    content: BytesMut,
    cursor: usize,
    config: Config,
}

impl ByteStream {
    /// Creates an empty stream with the default [Config].
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty stream with the provided [Config].
    pub fn with_config(config: Config) -> Self {
        Self {
            content: BytesMut::new(),
            cursor: 0,
            config,
        }
    }

    /// Creates a stream positioned at the start of a copy of `buf`.
    pub fn from_slice(buf: &[u8]) -> Self {
        Self {
            content: BytesMut::from(buf),
            cursor: 0,
            config: Config::default(),
        }
    }

    /// Clears the content and rewinds the cursor, keeping the allocation for reuse.
    pub fn reset(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// Replaces the content with `buf` and rewinds the cursor for a fresh decode pass.
    pub fn set_content(&mut self, buf: &[u8]) {
        self.content.clear();
        self.content.extend_from_slice(buf);
        self.cursor = 0;
    }

    /// Returns everything encoded into (or loaded into) the stream.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Consumes the stream, returning its content.
    pub fn into_content(self) -> BytesMut {
        self.content
    }

    /// Returns the bytes not yet consumed by decoding.
    pub fn remaining(&self) -> &[u8] {
        &self.content[self.cursor..]
    }

    /// Returns the offset of the read cursor.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Returns true if every byte has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.cursor == self.content.len()
    }

    /// Moves the cursor forward by `n` bytes. `n` must not exceed the remaining length.
    pub(crate) fn advance(&mut self, n: usize) {
        debug_assert!(n <= self.content.len() - self.cursor);
        self.cursor += n;
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Sets whether messages encoded through this stream should produce repeatable bytes.
    ///
    /// Only the flat capability and the fallback codec consult the flag.
    pub fn set_deterministic(&mut self, deterministic: bool) {
        self.config.deterministic = deterministic;
    }

    pub fn deterministic(&self) -> bool {
        self.config.deterministic
    }

    // ---------- Encoding ----------

    /// Appends a varint.
    pub fn encode_varint(&mut self, value: u64) {
        varint::write(value, &mut self.content);
    }

    /// Appends a little-endian 64-bit integer.
    pub fn encode_fixed64(&mut self, value: u64) {
        fixed::write64(value, &mut self.content);
    }

    /// Appends a little-endian 32-bit integer.
    pub fn encode_fixed32(&mut self, value: u32) {
        fixed::write32(value, &mut self.content);
    }

    /// Appends a ZigZag-mapped varint.
    pub fn encode_zigzag64(&mut self, value: i64) {
        self.encode_varint(value.zigzag());
    }

    /// Appends a ZigZag-mapped varint of a 32-bit value.
    pub fn encode_zigzag32(&mut self, value: i32) {
        self.encode_varint(u64::from(value.zigzag()));
    }

    /// Appends a varint length prefix followed by `buf`.
    pub fn encode_raw_bytes(&mut self, buf: &[u8]) {
        self.encode_varint(buf.len() as u64);
        self.content.extend_from_slice(buf);
    }

    /// Appends a length-delimited UTF-8 string.
    pub fn encode_string(&mut self, value: &str) {
        self.encode_raw_bytes(value.as_bytes());
    }

    /// Appends a field tag.
    pub fn encode_tag(&mut self, tag: Tag) {
        self.encode_varint(tag.to_raw());
    }

    /// Appends `message` without framing.
    pub fn marshal<M: Message>(&mut self, message: &M) -> Result<(), Error> {
        dispatch::write(
            self.config.fallback.as_deref(),
            self.config.deterministic,
            message,
            &mut self.content,
        )
    }

    /// Returns the exact number of bytes [ByteStream::marshal] appends for `message`.
    pub fn size<M: Message>(&self, message: &M) -> Result<usize, Error> {
        dispatch::size(self.config.fallback.as_deref(), message)
    }

    /// Appends `message` prefixed by its varint-encoded length.
    ///
    /// The size is queried before the body is written and storage is grown once to fit both.
    /// `message` must not change between the two passes.
    pub fn encode_message<M: Message>(&mut self, message: &M) -> Result<(), Error> {
        let size = self.size(message)?;
        self.content.reserve(size + varint::size(size as u64));
        self.encode_varint(size as u64);
        self.marshal(message)
    }

    // ---------- Decoding ----------

    /// Consumes a varint.
    ///
    /// The cursor does not move on failure.
    pub fn decode_varint(&mut self) -> Result<u64, Error> {
        let (value, consumed) = varint::read(self.remaining())?;
        self.cursor += consumed;
        Ok(value)
    }

    /// Consumes a little-endian 64-bit integer.
    pub fn decode_fixed64(&mut self) -> Result<u64, Error> {
        let value = fixed::read64(self.remaining())?;
        self.cursor += 8;
        Ok(value)
    }

    /// Consumes a little-endian 32-bit integer.
    pub fn decode_fixed32(&mut self) -> Result<u32, Error> {
        let value = fixed::read32(self.remaining())?;
        self.cursor += 4;
        Ok(value)
    }

    /// Consumes a ZigZag-mapped varint.
    pub fn decode_zigzag64(&mut self) -> Result<i64, Error> {
        Ok(i64::unzigzag(self.decode_varint()?))
    }

    /// Consumes a ZigZag-mapped varint of a 32-bit value, ignoring bits above the 32nd.
    pub fn decode_zigzag32(&mut self) -> Result<i32, Error> {
        Ok(i32::unzigzag(self.decode_varint()? as u32))
    }

    /// Consumes a field tag.
    pub fn decode_tag(&mut self) -> Result<Tag, Error> {
        let (raw, consumed) = varint::read(self.remaining())?;
        let tag = Tag::from_raw(raw)?;
        self.cursor += consumed;
        Ok(tag)
    }

    /// Consumes a length prefix and returns the extent of the bytes it covers, moving the cursor
    /// past them.
    ///
    /// If the extent is rejected, the cursor stays after the length prefix.
    fn decode_extent(&mut self) -> Result<Range<usize>, Error> {
        let len = self.decode_varint()?;
        let Some(len) = usize::try_from(len)
            .ok()
            .filter(|len| isize::try_from(*len).is_ok())
        else {
            debug!(len, "malformed length");
            return Err(Error::MalformedLength(len));
        };
        let start = self.cursor;
        let end = start
            .checked_add(len)
            .filter(|end| *end <= self.content.len())
            .ok_or(Error::UnexpectedEof)?;
        if !self.config.length.contains(&len) {
            debug!(len, "length outside configured range");
            return Err(Error::InvalidLength(len));
        }
        self.cursor = end;
        Ok(start..end)
    }

    /// Consumes a length-delimited value, returning a view into the stream's content.
    ///
    /// The view borrows the stream, so it cannot outlive the next mutation. Use
    /// [ByteStream::decode_raw_bytes_owned] for an independent copy.
    pub fn decode_raw_bytes(&mut self) -> Result<&[u8], Error> {
        let extent = self.decode_extent()?;
        Ok(&self.content[extent])
    }

    /// Consumes a length-delimited value, returning an owned copy.
    pub fn decode_raw_bytes_owned(&mut self) -> Result<Bytes, Error> {
        let extent = self.decode_extent()?;
        Ok(Bytes::copy_from_slice(&self.content[extent]))
    }

    /// Consumes a length-delimited UTF-8 string.
    pub fn decode_string(&mut self) -> Result<&str, Error> {
        let extent = self.decode_extent()?;
        Ok(std::str::from_utf8(&self.content[extent])?)
    }

    /// Consumes a length-delimited message, merging it into `message`.
    ///
    /// The cursor moves past the whole framed region before the inner decode runs, so it stays
    /// there even if decoding `message` fails.
    pub fn decode_message<M: Message>(&mut self, message: &mut M) -> Result<(), Error> {
        let extent = self.decode_extent()?;
        dispatch::merge(
            self.config.fallback.as_deref(),
            &self.content[extent],
            message,
        )
    }

    /// Decodes the rest of the stream into `message` without clearing it first.
    ///
    /// The cursor moves to the end of the content whether or not decoding succeeds.
    pub fn unmarshal<M: Message>(&mut self, message: &mut M) -> Result<(), Error> {
        let start = self.cursor;
        self.cursor = self.content.len();
        dispatch::merge(
            self.config.fallback.as_deref(),
            &self.content[start..],
            message,
        )
    }

    /// Clears `message`, then decodes the rest of the stream into it.
    ///
    /// Mirrors [crate::unmarshal] with the stream's [Config]. The cursor moves to the end of the
    /// content whether or not decoding succeeds.
    pub fn unmarshal_reset<M: Message>(&mut self, message: &mut M) -> Result<(), Error> {
        message.reset();
        self.unmarshal(message)
    }
}

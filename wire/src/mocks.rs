//! Message implementations covering each capability, for unit tests.

use crate::{varint, ByteStream, Error, Fallback, Flat, Legacy, Message, Tag, WireType};
use bytes::BytesMut;
use std::{
    any::Any,
    cell::Cell,
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
};

fn put_tag(field: u64, wire_type: WireType, buf: &mut BytesMut) {
    varint::write(Tag::new(field, wire_type).to_raw(), buf);
}

fn unknown_field(tag: Tag) -> Error {
    Error::External(format!("unknown field {}", tag.field).into())
}

/// Flat message: `1: varint id`, `2: zigzag delta`, `3: repeated varint values`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Fields {
    pub id: u64,
    pub delta: i64,
    pub values: Vec<u64>,
}

impl Flat for Fields {
    fn size(&self) -> usize {
        let mut size = 0;
        if self.id != 0 {
            size += 1 + varint::size(self.id);
        }
        if self.delta != 0 {
            size += 1 + varint::size(crate::ZigZag::zigzag(self.delta));
        }
        size + self
            .values
            .iter()
            .map(|value| 1 + varint::size(*value))
            .sum::<usize>()
    }

    fn marshal_into(&self, buf: &mut BytesMut, _: bool) -> Result<(), Error> {
        if self.id != 0 {
            put_tag(1, WireType::Varint, buf);
            varint::write(self.id, buf);
        }
        if self.delta != 0 {
            put_tag(2, WireType::Varint, buf);
            varint::write(crate::ZigZag::zigzag(self.delta), buf);
        }
        for value in &self.values {
            put_tag(3, WireType::Varint, buf);
            varint::write(*value, buf);
        }
        Ok(())
    }

    fn unmarshal_from(&mut self, buf: &[u8]) -> Result<(), Error> {
        let mut stream = ByteStream::from_slice(buf);
        while !stream.is_exhausted() {
            let tag = stream.decode_tag()?;
            tag.expect(WireType::Varint)?;
            match tag.field {
                1 => self.id = stream.decode_varint()?,
                2 => self.delta = stream.decode_zigzag64()?,
                3 => self.values.push(stream.decode_varint()?),
                _ => return Err(unknown_field(tag)),
            }
        }
        Ok(())
    }
}

impl Message for Fields {
    fn reset(&mut self) {
        *self = Self::default();
    }

    fn as_flat(&self) -> Option<&dyn Flat> {
        Some(self)
    }

    fn as_flat_mut(&mut self) -> Option<&mut dyn Flat> {
        Some(self)
    }
}

/// Legacy message: `1: varint count`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Tally {
    pub count: u64,
}

impl Legacy for Tally {
    fn marshal(&self) -> Result<Vec<u8>, Error> {
        let mut buf = Vec::new();
        varint::write(Tag::new(1, WireType::Varint).to_raw(), &mut buf);
        varint::write(self.count, &mut buf);
        Ok(buf)
    }

    fn unmarshal(&mut self, buf: &[u8]) -> Result<(), Error> {
        let mut stream = ByteStream::from_slice(buf);
        while !stream.is_exhausted() {
            let tag = stream.decode_tag()?;
            tag.expect(WireType::Varint)?;
            match tag.field {
                1 => self.count = stream.decode_varint()?,
                _ => return Err(unknown_field(tag)),
            }
        }
        Ok(())
    }
}

impl Message for Tally {
    fn reset(&mut self) {
        self.count = 0;
    }

    fn as_legacy(&self) -> Option<&dyn Legacy> {
        Some(self)
    }

    fn as_legacy_mut(&mut self) -> Option<&mut dyn Legacy> {
        Some(self)
    }
}

/// Counts calls made through a shared reference.
#[derive(Debug, Default)]
pub struct Counter(Cell<usize>);

impl Counter {
    pub fn bump(&self) {
        self.0.set(self.0.get() + 1);
    }

    pub fn get(&self) -> usize {
        self.0.get()
    }
}

/// Exposes both capabilities and records which one encoded it, and how often its size was
/// queried: `1: varint value`.
#[derive(Debug, Default)]
pub struct Both {
    pub sized: Counter,
    pub flat: Counter,
    pub legacy: Counter,
    pub value: u64,
}

impl Flat for Both {
    fn size(&self) -> usize {
        self.sized.bump();
        1 + varint::size(self.value)
    }

    fn marshal_into(&self, buf: &mut BytesMut, _: bool) -> Result<(), Error> {
        self.flat.bump();
        put_tag(1, WireType::Varint, buf);
        varint::write(self.value, buf);
        Ok(())
    }

    fn unmarshal_from(&mut self, buf: &[u8]) -> Result<(), Error> {
        let mut stream = ByteStream::from_slice(buf);
        stream.decode_tag()?.expect(WireType::Varint)?;
        self.value = stream.decode_varint()?;
        Ok(())
    }
}

impl Legacy for Both {
    fn marshal(&self) -> Result<Vec<u8>, Error> {
        self.legacy.bump();
        Ok(Vec::new())
    }

    fn unmarshal(&mut self, _: &[u8]) -> Result<(), Error> {
        Err(Error::External("legacy path taken".into()))
    }
}

impl Message for Both {
    fn reset(&mut self) {
        self.value = 0;
    }

    fn as_flat(&self) -> Option<&dyn Flat> {
        Some(self)
    }

    fn as_flat_mut(&mut self) -> Option<&mut dyn Flat> {
        Some(self)
    }

    fn as_legacy(&self) -> Option<&dyn Legacy> {
        Some(self)
    }

    fn as_legacy_mut(&mut self) -> Option<&mut dyn Legacy> {
        Some(self)
    }
}

/// Message without a self-serializing capability, encoded by [RecordFallback].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Record {
    pub entries: HashMap<u64, u64>,
}

impl Message for Record {
    fn reset(&mut self) {
        self.entries.clear();
    }
}

/// Message with no capability and no fallback support.
#[derive(Debug, Default)]
pub struct Bare;

impl Message for Bare {
    fn reset(&mut self) {}
}

/// Encodes each [Record] entry as `1: varint key` followed by `2: varint value`.
#[derive(Debug, Default)]
pub struct RecordFallback {
    deterministic: AtomicUsize,
}

impl RecordFallback {
    /// Returns how many times [Fallback::marshal] ran in deterministic mode.
    pub fn deterministic_calls(&self) -> usize {
        self.deterministic.load(Ordering::Relaxed)
    }

    fn record<'a>(message: &'a dyn Any) -> Result<&'a Record, Error> {
        message
            .downcast_ref::<Record>()
            .ok_or_else(|| Error::External("unsupported message".into()))
    }

    fn encode(record: &Record, deterministic: bool, buf: &mut BytesMut) {
        let mut entries: Vec<_> = record.entries.iter().collect();
        if deterministic {
            entries.sort_unstable();
        }
        for (key, value) in entries {
            put_tag(1, WireType::Varint, buf);
            varint::write(*key, buf);
            put_tag(2, WireType::Varint, buf);
            varint::write(*value, buf);
        }
    }
}

impl Fallback for RecordFallback {
    fn size(&self, message: &dyn Any) -> Result<usize, Error> {
        let mut buf = BytesMut::new();
        Self::encode(Self::record(message)?, false, &mut buf);
        Ok(buf.len())
    }

    fn marshal(
        &self,
        message: &dyn Any,
        buf: &mut BytesMut,
        deterministic: bool,
    ) -> Result<(), Error> {
        if deterministic {
            self.deterministic.fetch_add(1, Ordering::Relaxed);
        }
        Self::encode(Self::record(message)?, deterministic, buf);
        Ok(())
    }

    fn unmarshal(&self, message: &mut dyn Any, buf: &[u8]) -> Result<(), Error> {
        let record = message
            .downcast_mut::<Record>()
            .ok_or_else(|| Error::External("unsupported message".into()))?;
        let mut stream = ByteStream::from_slice(buf);
        let rejected = |_| Error::External("record rejected".into());
        while !stream.is_exhausted() {
            stream.decode_tag().map_err(rejected)?;
            let key = stream.decode_varint().map_err(rejected)?;
            stream.decode_tag().map_err(rejected)?;
            let value = stream.decode_varint().map_err(rejected)?;
            record.entries.insert(key, value);
        }
        Ok(())
    }
}

/// Finds the end of a group by walking its fields, tracking nested groups.
pub fn scan(buf: &[u8]) -> Option<(usize, usize)> {
    let mut stream = ByteStream::from_slice(buf);
    let mut depth = 0usize;
    loop {
        let start = stream.position();
        let tag = stream.decode_tag().ok()?;
        match tag.wire_type {
            WireType::Varint => {
                stream.decode_varint().ok()?;
            }
            WireType::Fixed64 => {
                stream.decode_fixed64().ok()?;
            }
            WireType::Fixed32 => {
                stream.decode_fixed32().ok()?;
            }
            WireType::LengthDelimited => {
                stream.decode_raw_bytes().ok()?;
            }
            WireType::StartGroup => depth += 1,
            WireType::EndGroup if depth == 0 => return Some((start, stream.position())),
            WireType::EndGroup => depth -= 1,
        }
    }
}

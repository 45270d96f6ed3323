#![no_main]

use arbitrary::Arbitrary;
use commonware_wire::{
    varint, ByteStream, Config, Dump, Error, Tag, WireType, ZigZag,
};
use libfuzzer_sys::fuzz_target;

/// Walks every field in `buf` until decoding fails, checking the cursor never moves backwards.
fn walk(buf: &[u8]) {
    let mut stream = ByteStream::from_slice(buf);
    while !stream.is_exhausted() {
        let start = stream.position();
        let Ok(tag) = stream.decode_tag() else {
            return;
        };
        let result = match tag.wire_type {
            WireType::Varint => stream.decode_varint().map(drop),
            WireType::Fixed64 => stream.decode_fixed64().map(drop),
            WireType::Fixed32 => stream.decode_fixed32().map(drop),
            WireType::LengthDelimited => stream.decode_raw_bytes().map(drop),
            WireType::StartGroup | WireType::EndGroup => Ok(()),
        };
        assert!(stream.position() > start);
        assert!(stream.position() <= buf.len());
        if result.is_err() {
            return;
        }
    }
}

fn decoders_agree(buf: &[u8]) {
    let result = varint::read(buf);
    assert_eq!(
        varint::decode_slice(buf),
        result.as_ref().map_or((0, 0), |decoded| *decoded)
    );

    // Padding forces the unrolled decoder whenever the first byte continues.
    let mut padded = buf.to_vec();
    padded.resize(buf.len().max(varint::MAX_LEN), 0);
    let padded_result = varint::read(&padded);
    match result {
        Ok(decoded) => assert_eq!(padded_result.unwrap(), decoded),
        Err(Error::Overflow) => assert!(matches!(padded_result, Err(Error::Overflow))),
        Err(Error::UnexpectedEof) => assert!(!matches!(padded_result, Err(Error::UnexpectedEof))),
        Err(err) => panic!("unexpected varint error: {err}"),
    }
}

fn roundtrip_varint(value: u64) {
    let mut stream = ByteStream::new();
    stream.encode_varint(value);
    assert_eq!(stream.content().len(), varint::size(value));
    assert_eq!(stream.decode_varint().unwrap(), value);
    assert!(stream.is_exhausted());
}

fn roundtrip_zigzag(value64: i64, value32: i32) {
    assert_eq!(i64::unzigzag(value64.zigzag()), value64);
    assert_eq!(i32::unzigzag(value32.zigzag()), value32);

    let mut stream = ByteStream::new();
    stream.encode_zigzag64(value64);
    stream.encode_zigzag32(value32);
    assert_eq!(stream.decode_zigzag64().unwrap(), value64);
    assert_eq!(stream.decode_zigzag32().unwrap(), value32);
}

fn frame(payload: &[u8], min: u16, max: u16) {
    let (min, max) = (min as usize, max as usize);
    let mut stream = ByteStream::with_config(Config::default().with_length(min..=max));
    stream.encode_tag(Tag::new(1, WireType::LengthDelimited));
    stream.encode_raw_bytes(payload);

    assert_eq!(
        stream.decode_tag().unwrap(),
        Tag::new(1, WireType::LengthDelimited)
    );
    let allowed = (min..=max).contains(&payload.len());
    match stream.decode_raw_bytes() {
        Ok(decoded) => {
            assert!(allowed);
            assert_eq!(decoded, payload);
        }
        Err(Error::InvalidLength(len)) => {
            assert!(!allowed);
            assert_eq!(len, payload.len());
        }
        Err(err) => panic!("unexpected frame error: {err}"),
    }
}

fn overflow(continuation_bytes: u8, last_byte: u8) {
    let continuation_bytes = continuation_bytes as usize % (varint::MAX_LEN + 2);
    let mut buf = vec![0xFF; continuation_bytes];
    buf.push(last_byte);
    let mut stream = ByteStream::from_slice(&buf);
    let result = stream.decode_varint();
    if continuation_bytes >= varint::MAX_LEN
        || (continuation_bytes == varint::MAX_LEN - 1 && last_byte & 0x80 != 0)
    {
        assert!(matches!(result, Err(Error::Overflow)));
    } else if last_byte & 0x80 != 0 {
        assert!(matches!(result, Err(Error::UnexpectedEof)));
    } else {
        assert!(result.is_ok());
        assert!(stream.is_exhausted());
    }
}

#[derive(Arbitrary, Debug)]
enum FuzzInput<'a> {
    Bytes(&'a [u8]),
    Varint(u64),
    ZigZag(i64, i32),
    Frame { payload: &'a [u8], min: u16, max: u16 },
    VarIntOverflow { continuation_bytes: u8, last_byte: u8 },
}

fn fuzz(input: FuzzInput) {
    match input {
        FuzzInput::Bytes(buf) => {
            decoders_agree(buf);
            walk(buf);
            let _ = Dump::new("fuzz", buf).to_string();
        }
        FuzzInput::Varint(value) => roundtrip_varint(value),
        FuzzInput::ZigZag(value64, value32) => roundtrip_zigzag(value64, value32),
        FuzzInput::Frame { payload, min, max } => frame(payload, min, max),
        FuzzInput::VarIntOverflow {
            continuation_bytes,
            last_byte,
        } => overflow(continuation_bytes, last_byte),
    }
}

fuzz_target!(|input: FuzzInput| {
    fuzz(input);
});

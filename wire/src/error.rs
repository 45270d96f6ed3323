//! Error types for wire operations

use crate::WireType;
use thiserror::Error;

/// Error type for wire operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("unexpected end of buffer")]
    UnexpectedEof,
    #[error("varint overflows 64 bits")]
    Overflow,
    #[error("malformed length: {0}")]
    MalformedLength(u64),
    #[error("invalid length: {0}")]
    InvalidLength(usize),
    #[error("unknown wire type: {0}")]
    UnknownWireType(u8),
    /// Raised by message implementations when a field arrives with a wire type
    /// other than the one its declaration requires. Never returned by the
    /// stream or dispatch operations themselves.
    #[error("bad wire type for field {field}: expected {expected:?}, found {found:?}")]
    BadWireType {
        field: u64,
        expected: WireType,
        found: WireType,
    },
    #[error("invalid utf-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    #[error("no fallback codec configured")]
    NoFallback,
    #[error(transparent)]
    External(#[from] Box<dyn std::error::Error + Send + Sync>),
}

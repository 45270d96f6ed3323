//! Configuration for [crate::ByteStream].

use crate::Fallback;
use core::ops::{Bound, RangeBounds};
use std::{fmt, sync::Arc};

/// Bounds on the lengths accepted for length-delimited values.
///
/// Lengths arrive from untrusted input as a varint prefix. A stream rejects a prefix outside the
/// bounds with [crate::Error::InvalidLength] instead of handing out the payload.
///
/// # Examples
///
/// ```
/// use commonware_wire::{ByteStream, Config, Error, RangeCfg};
///
/// // Strings of at most 8 bytes.
/// let limit = RangeCfg::new(..=8);
/// assert!(limit.contains(&5));
/// assert!(!limit.contains(&9));
///
/// let mut stream = ByteStream::with_config(Config::default().with_length(limit));
/// stream.encode_string("too long!");
/// assert!(matches!(stream.decode_string(), Err(Error::InvalidLength(9))));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct RangeCfg<T: Copy + PartialOrd> {
    low: Bound<T>,
    high: Bound<T>,
}

// Any standard range converts, so `Config::with_length` accepts `..=limit` directly.
macro_rules! impl_range_from {
    ($($range:ty),*) => {
        $(
            impl<T: Copy + PartialOrd> From<$range> for RangeCfg<T> {
                fn from(range: $range) -> Self {
                    Self::new(range)
                }
            }
        )*
    };
}
impl_range_from!(
    core::ops::Range<T>,
    core::ops::RangeInclusive<T>,
    core::ops::RangeFrom<T>,
    core::ops::RangeTo<T>,
    core::ops::RangeToInclusive<T>,
    core::ops::RangeFull
);

impl<T: Copy + PartialOrd> RangeCfg<T> {
    /// Copies the bounds of `range`.
    pub fn new(range: impl RangeBounds<T>) -> Self {
        Self {
            low: range.start_bound().cloned(),
            high: range.end_bound().cloned(),
        }
    }

    /// Returns true if a length-delimited value of `len` bytes is accepted.
    pub fn contains(&self, len: &T) -> bool {
        RangeBounds::contains(self, len)
    }
}

impl<T: Copy + PartialOrd> RangeBounds<T> for RangeCfg<T> {
    fn start_bound(&self) -> Bound<&T> {
        self.low.as_ref()
    }

    fn end_bound(&self) -> Bound<&T> {
        self.high.as_ref()
    }
}

impl<T: Copy + PartialOrd> Default for RangeCfg<T> {
    fn default() -> Self {
        Self::new(..)
    }
}

/// Options shared by every operation on a [crate::ByteStream].
#[derive(Clone, Default)]
pub struct Config {
    /// Whether the flat capability and the fallback codec should emit repeatable bytes for equal
    /// messages (for example, by sorting map keys).
    ///
    /// Deterministic output is not canonical across implementations or schema versions.
    pub deterministic: bool,

    /// Accepted lengths for length-delimited values.
    pub length: RangeCfg<usize>,

    /// Codec used for messages that expose neither self-serializing capability.
    pub fallback: Option<Arc<dyn Fallback>>,
}

impl Config {
    /// Sets [Config::deterministic].
    pub fn with_deterministic(mut self, deterministic: bool) -> Self {
        self.deterministic = deterministic;
        self
    }

    /// Sets [Config::length].
    pub fn with_length(mut self, length: impl Into<RangeCfg<usize>>) -> Self {
        self.length = length.into();
        self
    }

    /// Sets [Config::fallback].
    pub fn with_fallback(mut self, fallback: Arc<dyn Fallback>) -> Self {
        self.fallback = Some(fallback);
        self
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("deterministic", &self.deterministic)
            .field("length", &self.length)
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

//! Capabilities a message can expose to the dispatcher.
//!
//! A [Message] is encoded through the first capability it exposes, in this order:
//!
//! 1. [Flat]: appends its fields directly to the caller's buffer. Preferred for generated code.
//! 2. [Legacy]: produces and consumes owned byte vectors. Kept for older implementations.
//! 3. Neither: the [Fallback] codec configured on the stream encodes the message by inspecting it.

use crate::Error;
use bytes::BytesMut;
use std::any::Any;

/// A message that serializes itself into a caller-provided buffer, without framing.
pub trait Flat {
    /// Returns the exact number of bytes [Flat::marshal_into] appends.
    fn size(&self) -> usize;

    /// Appends the encoded fields to `buf`.
    fn marshal_into(&self, buf: &mut BytesMut, deterministic: bool) -> Result<(), Error>;

    /// Decodes fields from `buf`, merging them into the current contents.
    fn unmarshal_from(&mut self, buf: &[u8]) -> Result<(), Error>;
}

/// A self-describing message using the older owned-bytes calling convention.
///
/// Implementations disagree on whether [Legacy::unmarshal] clears the message first. Callers
/// relying on merge semantics must not assume either behavior.
pub trait Legacy {
    /// Returns the encoded fields.
    fn marshal(&self) -> Result<Vec<u8>, Error>;

    /// Decodes fields from `buf`.
    fn unmarshal(&mut self, buf: &[u8]) -> Result<(), Error>;

    /// Returns the number of bytes [Legacy::marshal] produces, or 0 if it fails.
    fn size(&self) -> usize {
        self.marshal().map_or(0, |buf| buf.len())
    }
}

/// A structured value that can be encoded to and decoded from the wire format.
pub trait Message: Any {
    /// Clears every field.
    fn reset(&mut self);

    /// Returns the flat capability, if implemented.
    fn as_flat(&self) -> Option<&dyn Flat> {
        None
    }

    /// Returns the flat capability, if implemented.
    fn as_flat_mut(&mut self) -> Option<&mut dyn Flat> {
        None
    }

    /// Returns the legacy capability, if implemented.
    fn as_legacy(&self) -> Option<&dyn Legacy> {
        None
    }

    /// Returns the legacy capability, if implemented.
    fn as_legacy_mut(&mut self) -> Option<&mut dyn Legacy> {
        None
    }
}

/// Generic codec for messages that cannot serialize themselves.
///
/// Implementations inspect the message (typically through field descriptors) and must honor
/// `deterministic` when producing bytes, for example by emitting map entries sorted by key.
pub trait Fallback: Send + Sync {
    /// Returns the exact number of bytes [Fallback::marshal] appends for `message`.
    fn size(&self, message: &dyn Any) -> Result<usize, Error>;

    /// Appends the encoded fields of `message` to `buf`.
    fn marshal(&self, message: &dyn Any, buf: &mut BytesMut, deterministic: bool)
        -> Result<(), Error>;

    /// Decodes fields from `buf`, merging them into `message`.
    fn unmarshal(&self, message: &mut dyn Any, buf: &[u8]) -> Result<(), Error>;
}

/// The capability a message is dispatched through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Flat,
    Legacy,
    Generic,
}

impl Capability {
    /// Selects the capability for `message`, honoring the priority order.
    pub fn of<M: Message + ?Sized>(message: &M) -> Self {
        if message.as_flat().is_some() {
            Self::Flat
        } else if message.as_legacy().is_some() {
            Self::Legacy
        } else {
            Self::Generic
        }
    }
}

//! Entry points that route a message through its highest-priority capability.
//!
//! See [crate::message] for the priority order. Messages exposing neither self-serializing
//! capability reach the [Fallback] of the [Config] passed to the `*_with` forms. The plain forms
//! use [Config::default], which has no fallback, so they fail with [Error::NoFallback] for such
//! messages.
//!
//! Errors returned by a capability or the fallback are forwarded untouched.

use crate::{Capability, Config, Error, Fallback, Message};
use bytes::{Bytes, BytesMut};
use tracing::trace;

/// Encodes `message` without framing.
pub fn marshal<M: Message>(message: &M) -> Result<Bytes, Error> {
    marshal_with(&Config::default(), message)
}

/// Encodes `message` without framing, honoring `config`'s deterministic flag and fallback.
pub fn marshal_with<M: Message>(config: &Config, message: &M) -> Result<Bytes, Error> {
    let mut buf = BytesMut::new();
    if let Some(flat) = message.as_flat() {
        buf.reserve(flat.size());
    }
    write(
        config.fallback.as_deref(),
        config.deterministic,
        message,
        &mut buf,
    )?;
    Ok(buf.freeze())
}

/// Clears `message`, then decodes `buf` into it.
pub fn unmarshal<M: Message>(buf: &[u8], message: &mut M) -> Result<(), Error> {
    unmarshal_with(&Config::default(), buf, message)
}

/// Clears `message`, then decodes `buf` into it, reaching `config`'s fallback if needed.
pub fn unmarshal_with<M: Message>(
    config: &Config,
    buf: &[u8],
    message: &mut M,
) -> Result<(), Error> {
    message.reset();
    merge(config.fallback.as_deref(), buf, message)
}

/// Decodes `buf` into `message` on top of its current contents.
///
/// Whether existing fields survive depends on the capability: [crate::Flat] and the fallback
/// merge, while [crate::Legacy] implementations may clear the message first.
pub fn unmarshal_merge<M: Message>(buf: &[u8], message: &mut M) -> Result<(), Error> {
    unmarshal_merge_with(&Config::default(), buf, message)
}

/// Like [unmarshal_merge], reaching `config`'s fallback if needed.
pub fn unmarshal_merge_with<M: Message>(
    config: &Config,
    buf: &[u8],
    message: &mut M,
) -> Result<(), Error> {
    merge(config.fallback.as_deref(), buf, message)
}

/// Returns the exact number of bytes [write] appends for `message`.
pub(crate) fn size<M: Message>(
    fallback: Option<&dyn Fallback>,
    message: &M,
) -> Result<usize, Error> {
    if let Some(flat) = message.as_flat() {
        return Ok(flat.size());
    }
    if let Some(legacy) = message.as_legacy() {
        return Ok(legacy.size());
    }
    fallback.ok_or(Error::NoFallback)?.size(message)
}

/// Appends the unframed encoding of `message` to `buf`.
///
/// Callers reserve capacity; this never queries the size.
pub(crate) fn write<M: Message>(
    fallback: Option<&dyn Fallback>,
    deterministic: bool,
    message: &M,
    buf: &mut BytesMut,
) -> Result<(), Error> {
    if let Some(flat) = message.as_flat() {
        trace!(capability = ?Capability::Flat, "marshal");
        return flat.marshal_into(buf, deterministic);
    }
    if let Some(legacy) = message.as_legacy() {
        trace!(capability = ?Capability::Legacy, "marshal");
        buf.extend_from_slice(&legacy.marshal()?);
        return Ok(());
    }
    trace!(capability = ?Capability::Generic, deterministic, "marshal");
    fallback
        .ok_or(Error::NoFallback)?
        .marshal(message, buf, deterministic)
}

/// Decodes `buf` into `message` without clearing it first.
pub(crate) fn merge<M: Message>(
    fallback: Option<&dyn Fallback>,
    buf: &[u8],
    message: &mut M,
) -> Result<(), Error> {
    if let Some(flat) = message.as_flat_mut() {
        trace!(capability = ?Capability::Flat, len = buf.len(), "unmarshal");
        return flat.unmarshal_from(buf);
    }
    if let Some(legacy) = message.as_legacy_mut() {
        trace!(capability = ?Capability::Legacy, len = buf.len(), "unmarshal");
        return legacy.unmarshal(buf);
    }
    trace!(capability = ?Capability::Generic, len = buf.len(), "unmarshal");
    fallback.ok_or(Error::NoFallback)?.unmarshal(message, buf)
}

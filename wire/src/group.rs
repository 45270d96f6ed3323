//! Legacy tag-delimited groups.
//!
//! A group opens with a `StartGroup` tag and closes with an `EndGroup` tag at the same nesting
//! depth, with no length prefix. Locating the closing tag requires walking the enclosed fields,
//! which is delegated to a [FindEndGroup] implementation.

use crate::{dispatch, ByteStream, Error, Message};
use tracing::debug;

/// Locates the `EndGroup` tag closing the group that `buf` starts inside of.
pub trait FindEndGroup {
    /// Returns `(end, consumed)`: the offset of the `EndGroup` tag (the end of the group's body)
    /// and the offset just past it. Returns `None` if `buf` ends before the group does.
    fn find_end_group(&self, buf: &[u8]) -> Option<(usize, usize)>;
}

impl<F: Fn(&[u8]) -> Option<(usize, usize)>> FindEndGroup for F {
    fn find_end_group(&self, buf: &[u8]) -> Option<(usize, usize)> {
        self(buf)
    }
}

impl ByteStream {
    /// Consumes a group body and its `EndGroup` tag, decoding the body into `message`.
    ///
    /// The `StartGroup` tag must already be consumed. `message` is cleared before decoding. As
    /// with [ByteStream::decode_message], the cursor moves past the `EndGroup` tag even if
    /// decoding `message` fails.
    pub fn decode_group<M: Message>(
        &mut self,
        scanner: &impl FindEndGroup,
        message: &mut M,
    ) -> Result<(), Error> {
        let remaining = self.remaining();
        let Some((end, consumed)) = scanner
            .find_end_group(remaining)
            .filter(|(end, consumed)| end <= consumed && *consumed <= remaining.len())
        else {
            debug!(position = self.position(), "unterminated group");
            return Err(Error::UnexpectedEof);
        };

        let start = self.position();
        message.reset();
        let result = dispatch::merge(
            self.config().fallback.as_deref(),
            &self.content()[start..start + end],
            message,
        );
        self.advance(consumed);
        result
    }
}

//! Response body accumulation.
//!
//! The transport engine hands over the body in chunks of arbitrary size that
//! are never NUL-terminated. `ByteAccumulator` appends them into one owned
//! buffer and keeps a single `0` byte after the logical content, so the body
//! can be handed to C as a string without another copy. `len()` is the only
//! authority on where the content ends: embedded zero bytes are data.

use std::borrow::Cow;

use crate::error::RequestError;

/// Growable owned byte buffer with a trailing terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteAccumulator {
    // Always non-empty; the last byte is the terminator.
    buf: Vec<u8>,
}

impl ByteAccumulator {
    pub fn new() -> Self {
        Self { buf: vec![0] }
    }

    /// Append `chunk` after the current content.
    ///
    /// Room for the chunk is reserved before anything is touched, so on
    /// allocation failure the previous content is left exactly as it was.
    pub fn append(&mut self, chunk: &[u8]) -> Result<(), RequestError> {
        self.buf
            .try_reserve(chunk.len())
            .map_err(|_| RequestError::OutOfMemory("response body"))?;

        let end = self.len();
        self.buf.truncate(end);
        self.buf.extend_from_slice(chunk);
        self.buf.push(0);
        Ok(())
    }

    /// Number of content bytes appended so far.
    pub fn len(&self) -> usize {
        self.buf.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// The accumulated content, without the terminator.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len()]
    }

    /// The accumulated content followed by the terminator byte.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.buf
    }

    /// The content decoded as UTF-8, with invalid sequences replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }

    pub fn clear(&mut self) {
        self.buf.clear();
        self.buf.push(0);
    }

    pub fn into_vec(mut self) -> Vec<u8> {
        self.buf.pop();
        self.buf
    }
}

impl Default for ByteAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

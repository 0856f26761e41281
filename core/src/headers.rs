//! Header line storage.
//!
//! # Design
//! Header lines are kept as the exact bytes the engine delivered (status line
//! included, trailing CRLF included) plus one explicit terminator byte. Parsing
//! into name/value is done lazily on lookup, so nothing the server sent is
//! lost or normalized away.

use std::fmt;

use crate::error::RequestError;

/// End-of-headers sentinel delivered after the last header of a response.
pub const HEADER_SENTINEL: &[u8] = b"\r\n";

/// One owned header line followed by a terminator byte.
#[derive(Clone, PartialEq, Eq)]
pub struct HeaderLine {
    bytes: Box<[u8]>,
}

impl HeaderLine {
    /// Duplicate `line` into a fresh allocation of exactly `line.len() + 1`
    /// bytes.
    pub fn copy_from(line: &[u8]) -> Result<Self, RequestError> {
        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(line.len() + 1)
            .map_err(|_| RequestError::OutOfMemory("header line"))?;
        bytes.extend_from_slice(line);
        bytes.push(0);
        Ok(Self {
            bytes: bytes.into_boxed_slice(),
        })
    }

    pub fn len(&self) -> usize {
        self.bytes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len()]
    }

    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.bytes
    }

    /// The line as UTF-8, or `None` if it is not valid UTF-8.
    pub fn to_str(&self) -> Option<&str> {
        std::str::from_utf8(self.as_bytes()).ok()
    }

    /// Split a `Name: value` line. The value is trimmed of surrounding
    /// whitespace, which also drops the trailing CRLF.
    ///
    /// Returns `None` for lines without a colon, such as the status line.
    pub fn name_value(&self) -> Option<(&str, &str)> {
        let (name, value) = self.to_str()?.split_once(':')?;
        let name = name.trim();
        if name.is_empty() || name.contains(' ') {
            return None;
        }
        Some((name, value.trim()))
    }
}

impl fmt::Debug for HeaderLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", String::from_utf8_lossy(self.as_bytes()))
    }
}

/// Ordered collection of received header lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderCollector {
    lines: Vec<HeaderLine>,
}

impl HeaderCollector {
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Store one delivered header line. The end-of-headers sentinel is
    /// recognized and dropped.
    pub fn collect(&mut self, line: &[u8]) -> Result<(), RequestError> {
        if line == HEADER_SENTINEL {
            return Ok(());
        }
        self.lines
            .try_reserve(1)
            .map_err(|_| RequestError::OutOfMemory("response headers"))?;
        let owned = HeaderLine::copy_from(line)?;
        self.lines.push(owned);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[HeaderLine] {
        &self.lines
    }

    /// First value for header `name`, compared case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.lines
            .iter()
            .filter_map(HeaderLine::name_value)
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

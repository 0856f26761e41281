//! Plain-data description of one exchange handed to a transport engine.
//!
//! # Design
//! The executor never talks to the network. It fills an `Exchange` that
//! borrows everything it needs for one `Engine::perform` call, so the engine
//! holds no reference to request state once the call returns.

use crate::error::RequestError;

/// Request method as the engine sees it.
///
/// `Custom` is the generic override: the engine sends whatever method string
/// it carries while keeping the body handling it would use for a POST.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method<'a> {
    Get,
    Post,
    Custom(&'a str),
}

impl Method<'_> {
    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Custom(name) => name,
        }
    }
}

/// Outgoing header lines, each in `Name: value` form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderList {
    lines: Vec<String>,
}

impl HeaderList {
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    pub fn append(&mut self, line: &str) -> Result<(), RequestError> {
        self.lines
            .try_reserve(1)
            .map_err(|_| RequestError::OutOfMemory("outgoing header list"))?;
        let mut owned = String::new();
        owned
            .try_reserve_exact(line.len())
            .map_err(|_| RequestError::OutOfMemory("outgoing header list"))?;
        owned.push_str(line);
        self.lines.push(owned);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// True if a line for header `name` is present, compared
    /// case-insensitively.
    pub fn contains(&self, name: &str) -> bool {
        self.iter().any(|line| {
            line.split_once(':')
                .is_some_and(|(n, _)| n.trim().eq_ignore_ascii_case(name))
        })
    }
}

/// Everything an engine needs to perform one request.
#[derive(Debug, Clone, Copy)]
pub struct Exchange<'a> {
    pub url: &'a str,
    pub method: Method<'a>,
    pub headers: &'a HeaderList,
    /// Request payload, sent verbatim. `None` sends no body.
    pub body: Option<&'a [u8]>,
    pub user_agent: &'a str,
}

//! Per-request state owned by the caller.
//!
//! # Design
//! A `RequestContext` owns every buffer an exchange fills: the body, the
//! received header lines and the copies of custom headers the caller sent.
//! There is no global "already initialized" state. `init` always hands out a
//! fresh context, `reset` is the teardown-then-reinit used between sequential
//! requests, and `close` (or simply dropping the value) releases everything.

use std::borrow::Cow;

use serde::de::DeserializeOwned;

use crate::body::ByteAccumulator;
use crate::error::RequestError;
use crate::headers::{HeaderCollector, HeaderLine};

/// Success verdict of the last completed exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verdict {
    /// No exchange has completed on this context yet.
    #[default]
    Unset,
    Ok,
    NotOk,
}

impl Verdict {
    /// `Ok` iff `0 < status < 400`.
    pub fn from_status(status: u16) -> Self {
        if status == 0 || status >= 400 {
            Verdict::NotOk
        } else {
            Verdict::Ok
        }
    }

    /// Tri-state as an integer: -1 unset, 0 not ok, 1 ok.
    pub fn as_raw(self) -> i32 {
        match self {
            Verdict::Unset => -1,
            Verdict::NotOk => 0,
            Verdict::Ok => 1,
        }
    }
}

/// Accumulated response state for one request lifecycle.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    status_code: u16,
    url: Option<String>,
    body: ByteAccumulator,
    request_headers: Vec<HeaderLine>,
    response_headers: HeaderCollector,
    verdict: Verdict,
}

impl RequestContext {
    pub fn init() -> Self {
        Self::default()
    }

    /// Release all owned buffers.
    pub fn close(self) {}

    /// Drop everything a previous exchange left behind and start over.
    pub fn reset(&mut self) {
        *self = Self::init();
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    pub fn is_ok(&self) -> bool {
        self.verdict == Verdict::Ok
    }

    pub fn body(&self) -> &ByteAccumulator {
        &self.body
    }

    /// Number of body bytes received.
    pub fn size(&self) -> usize {
        self.body.len()
    }

    pub fn text(&self) -> Cow<'_, str> {
        self.body.text()
    }

    /// Deserialize the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(self.body.as_bytes())
    }

    pub fn response_headers(&self) -> &[HeaderLine] {
        self.response_headers.lines()
    }

    /// First value of response header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.response_headers.get(name)
    }

    pub fn request_headers(&self) -> &[HeaderLine] {
        &self.request_headers
    }

    pub(crate) fn begin(&mut self, url: &str) {
        self.url = Some(url.to_owned());
    }

    pub(crate) fn record_request_header(&mut self, line: &str) -> Result<(), RequestError> {
        self.request_headers
            .try_reserve(1)
            .map_err(|_| RequestError::OutOfMemory("request headers"))?;
        let owned = HeaderLine::copy_from(line.as_bytes())?;
        self.request_headers.push(owned);
        Ok(())
    }

    /// Body and header accumulators, borrowed separately so both can be handed
    /// to an engine at once.
    pub(crate) fn sinks(&mut self) -> (&mut ByteAccumulator, &mut HeaderCollector) {
        (&mut self.body, &mut self.response_headers)
    }

    pub(crate) fn finish(&mut self, status_code: u16) {
        self.status_code = status_code;
        self.verdict = Verdict::from_status(status_code);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_empty_and_unset() {
        let ctx = RequestContext::init();
        assert_eq!(ctx.status_code(), 0);
        assert_eq!(ctx.url(), None);
        assert_eq!(ctx.size(), 0);
        assert_eq!(ctx.body().as_bytes_with_nul(), b"\0");
        assert!(ctx.response_headers().is_empty());
        assert!(ctx.request_headers().is_empty());
        assert_eq!(ctx.verdict(), Verdict::Unset);
        assert_eq!(ctx.verdict().as_raw(), -1);
    }

    #[test]
    fn verdict_table() {
        assert_eq!(Verdict::from_status(200), Verdict::Ok);
        assert_eq!(Verdict::from_status(204), Verdict::Ok);
        assert_eq!(Verdict::from_status(302), Verdict::Ok);
        assert_eq!(Verdict::from_status(399), Verdict::Ok);
        assert_eq!(Verdict::from_status(400), Verdict::NotOk);
        assert_eq!(Verdict::from_status(404), Verdict::NotOk);
        assert_eq!(Verdict::from_status(500), Verdict::NotOk);
        assert_eq!(Verdict::from_status(0), Verdict::NotOk);
    }

    #[test]
    fn finish_sets_status_and_verdict() {
        let mut ctx = RequestContext::init();
        ctx.finish(404);
        assert_eq!(ctx.status_code(), 404);
        assert!(!ctx.is_ok());
        ctx.finish(200);
        assert!(ctx.is_ok());
        assert_eq!(ctx.verdict().as_raw(), 1);
    }

    #[test]
    fn request_headers_are_independent_copies() {
        let mut ctx = RequestContext::init();
        let mut line = String::from("X-Trace: abc");
        ctx.record_request_header(&line).unwrap();
        line.push_str("def");
        assert_eq!(ctx.request_headers()[0].as_bytes(), b"X-Trace: abc");
    }

    #[test]
    fn json_body_deserializes() {
        let mut ctx = RequestContext::init();
        let (body, _) = ctx.sinks();
        body.append(br#"{"name":"li"#).unwrap();
        body.append(br#"brequests"}"#).unwrap();
        let value: serde_json::Value = ctx.json().unwrap();
        assert_eq!(value["name"], "librequests");
    }

    #[test]
    fn reset_releases_previous_state() {
        let mut ctx = RequestContext::init();
        for round in 0..10_000u32 {
            ctx.begin("http://localhost/");
            let (body, headers) = ctx.sinks();
            body.append(&[b'x'; 256]).unwrap();
            headers.collect(b"HTTP/1.1 200 OK\r\n").unwrap();
            ctx.record_request_header("X-Round: 1").unwrap();
            ctx.finish(200);
            assert_eq!(ctx.size(), 256, "round {round}");
            assert_eq!(ctx.response_headers().len(), 1, "round {round}");

            ctx.reset();
            assert_eq!(ctx.size(), 0);
            assert!(ctx.response_headers().is_empty());
            assert!(ctx.request_headers().is_empty());
            assert_eq!(ctx.verdict(), Verdict::Unset);
            assert!(ctx.body().capacity() < 256);
        }
        ctx.close();
    }
}

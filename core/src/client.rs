//! Request execution pipelines.
//!
//! # Design
//! `Client` owns a transport engine and nothing else. Each call borrows a
//! `RequestContext`, describes the request as an `Exchange`, lets the engine
//! push the response into the context's accumulators, then records the
//! status code and verdict. Per-call state (outgoing header list, client
//! identifier) lives on the stack of the call and is released on every return
//! path, early errors included.

use tracing::{debug, warn};

use crate::agent::user_agent;
use crate::context::RequestContext;
use crate::encode::encode_key_values;
use crate::engine::Engine;
use crate::error::RequestError;
use crate::http::{Exchange, HeaderList, Method};

/// Header asserted when a POST or PUT carries no body.
pub const EMPTY_CONTENT_LENGTH: &str = "Content-Length: 0";

/// Method selector for the shared POST/PUT pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PtMethod {
    Post,
    Put,
}

impl PtMethod {
    fn engine_method(self) -> Method<'static> {
        match self {
            PtMethod::Post => Method::Post,
            // Same body path as POST with the method overridden.
            PtMethod::Put => Method::Custom("PUT"),
        }
    }
}

/// Synchronous request executor over a transport engine.
#[derive(Debug, Clone, Default)]
pub struct Client<E> {
    engine: E,
}

impl<E: Engine> Client<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn into_engine(self) -> E {
        self.engine
    }

    /// Perform a GET request, accumulating the response into `ctx`.
    pub fn get(&mut self, ctx: &mut RequestContext, url: &str) -> Result<(), RequestError> {
        let headers = HeaderList::new();
        self.exchange(ctx, url, Method::Get, &headers, None)
    }

    /// POST `body` verbatim. With no body, an explicit zero content length is
    /// sent.
    pub fn post(
        &mut self,
        ctx: &mut RequestContext,
        url: &str,
        body: Option<&[u8]>,
    ) -> Result<(), RequestError> {
        self.pt::<&str>(ctx, url, body, None, PtMethod::Post)
    }

    pub fn put(
        &mut self,
        ctx: &mut RequestContext,
        url: &str,
        body: Option<&[u8]>,
    ) -> Result<(), RequestError> {
        self.pt::<&str>(ctx, url, body, None, PtMethod::Put)
    }

    /// POST with extra `Name: value` header lines. Each line is also recorded
    /// in `ctx.request_headers()`.
    pub fn post_with_headers<S: AsRef<str>>(
        &mut self,
        ctx: &mut RequestContext,
        url: &str,
        body: Option<&[u8]>,
        headers: &[S],
    ) -> Result<(), RequestError> {
        self.pt(ctx, url, body, Some(headers), PtMethod::Post)
    }

    pub fn put_with_headers<S: AsRef<str>>(
        &mut self,
        ctx: &mut RequestContext,
        url: &str,
        body: Option<&[u8]>,
        headers: &[S],
    ) -> Result<(), RequestError> {
        self.pt(ctx, url, body, Some(headers), PtMethod::Put)
    }

    /// Shared POST/PUT pipeline.
    pub fn pt<S: AsRef<str>>(
        &mut self,
        ctx: &mut RequestContext,
        url: &str,
        body: Option<&[u8]>,
        custom_headers: Option<&[S]>,
        method: PtMethod,
    ) -> Result<(), RequestError> {
        let mut outgoing = HeaderList::new();
        if body.is_none() {
            outgoing.append(EMPTY_CONTENT_LENGTH)?;
        }
        for line in custom_headers.unwrap_or_default() {
            let line = line.as_ref();
            outgoing.append(line)?;
            ctx.record_request_header(line)?;
        }

        self.exchange(ctx, url, method.engine_method(), &outgoing, body)
    }

    /// Encode alternating keys and values with this client's engine.
    pub fn encode_key_values<S: AsRef<[u8]>>(&self, pairs: &[S]) -> Option<String> {
        encode_key_values(&self.engine, pairs)
    }

    fn exchange(
        &mut self,
        ctx: &mut RequestContext,
        url: &str,
        method: Method<'_>,
        headers: &HeaderList,
        body: Option<&[u8]>,
    ) -> Result<(), RequestError> {
        ctx.begin(url);
        let user_agent = user_agent();
        let exchange = Exchange {
            url,
            method,
            headers,
            body,
            user_agent: &user_agent,
        };

        debug!(
            method = method.as_str(),
            url,
            headers = headers.len(),
            body_len = body.map(<[u8]>::len),
            "performing exchange"
        );

        let (body_sink, header_sink) = ctx.sinks();
        if let Err(e) = self.engine.perform(&exchange, body_sink, header_sink) {
            warn!(
                method = method.as_str(),
                url,
                code = e.code().as_raw(),
                error = %e,
                "exchange failed"
            );
            return Err(e);
        }

        ctx.finish(self.engine.response_code());
        debug!(
            status = ctx.status_code(),
            ok = ctx.is_ok(),
            bytes = ctx.size(),
            "exchange complete"
        );
        Ok(())
    }
}

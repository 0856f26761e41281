//! `Engine` implementation backed by a blocking `ureq` agent.
//!
//! # Design
//! ureq hands back a parsed response rather than raw header lines, so the
//! engine re-serializes it into the line-oriented form the sinks expect: a
//! status line, one `Name: value\r\n` line per header, then the `\r\n`
//! sentinel. The body is streamed through the body sink in fixed-size reads,
//! so the sink sees many chunks for large bodies.
//!
//! ureq is built without content decoding: no `Accept-Encoding` is sent, the
//! body arrives as the server encoded it and `Content-Encoding` and
//! `Content-Length` stay in the delivered header lines.
//!
//! # Limitations
//! Lines are rebuilt from ureq's parsed `HeaderMap`, not copied from the wire:
//! - header names are lower-cased;
//! - repeated headers are grouped under the position of their first
//!   occurrence, values kept in arrival order;
//! - the status line carries the canonical reason phrase for the code, not
//!   the one the server sent.

use std::fmt;
use std::io::{self, Read};

use tracing::trace;
use ureq::http;
use ureq::Agent;
use url::Url;

use crate::config::EngineConfig;
use crate::engine::{BodySink, Engine, HeaderSink};
use crate::error::{ErrorCode, RequestError};
use crate::headers::HEADER_SENTINEL;
use crate::http::{Exchange, Method};

const READ_CHUNK: usize = 16 * 1024;

/// Content type a form-posting transport assumes for a bare payload.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Blocking HTTP/1.1 transport.
pub struct UreqEngine {
    agent: Agent,
    response_code: u16,
}

impl UreqEngine {
    pub fn new(config: &EngineConfig) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .max_redirects(config.max_redirects)
            .timeout_global(config.timeout())
            .build()
            .new_agent();
        Self {
            agent,
            response_code: 0,
        }
    }

    fn build_request(
        exchange: &Exchange<'_>,
    ) -> Result<http::request::Builder, RequestError> {
        let url = Url::parse(exchange.url)
            .map_err(|e| RequestError::transport(ErrorCode::UrlMalformat, e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(RequestError::transport(
                ErrorCode::UnsupportedProtocol,
                format!("scheme {:?} is not supported", url.scheme()),
            ));
        }

        let mut builder = http::Request::builder()
            .method(exchange.method.as_str())
            .uri(url.as_str())
            .header(http::header::USER_AGENT, exchange.user_agent);

        for line in exchange.headers.iter() {
            let Some((name, value)) = line.split_once(':') else {
                trace!(line, "skipping header line without a colon");
                continue;
            };
            builder = builder.header(name.trim(), value.trim());
        }

        if exchange.body.is_some() && !exchange.headers.contains("Content-Type") {
            builder = builder.header(http::header::CONTENT_TYPE, FORM_CONTENT_TYPE);
        }

        Ok(builder)
    }

    fn send(
        &self,
        exchange: &Exchange<'_>,
        builder: http::request::Builder,
    ) -> Result<http::Response<ureq::Body>, RequestError> {
        let sent = match (exchange.body, exchange.method) {
            (Some(payload), _) => self.agent.run(builder.body(payload).map_err(invalid)?),
            (None, Method::Get) => self.agent.run(builder.body(()).map_err(invalid)?),
            (None, _) => self.agent.run(builder.body(&b""[..]).map_err(invalid)?),
        };
        sent.map_err(map_ureq_error)
    }
}

impl fmt::Debug for UreqEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqEngine")
            .field("response_code", &self.response_code)
            .finish_non_exhaustive()
    }
}

impl Default for UreqEngine {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl Engine for UreqEngine {
    fn perform(
        &mut self,
        exchange: &Exchange<'_>,
        body: &mut dyn BodySink,
        headers: &mut dyn HeaderSink,
    ) -> Result<(), RequestError> {
        let builder = Self::build_request(exchange)?;
        let response = self.send(exchange, builder)?;
        let (parts, mut response_body) = response.into_parts();

        let status_line = format!(
            "{:?} {} {}\r\n",
            parts.version,
            parts.status.as_u16(),
            parts.status.canonical_reason().unwrap_or("")
        );
        headers.write_header(status_line.as_bytes())?;

        let mut line = Vec::new();
        for (name, value) in parts.headers.iter() {
            line.clear();
            line.extend_from_slice(name.as_str().as_bytes());
            line.extend_from_slice(b": ");
            line.extend_from_slice(value.as_bytes());
            line.extend_from_slice(b"\r\n");
            headers.write_header(&line)?;
        }
        headers.write_header(HEADER_SENTINEL)?;

        let mut reader = response_body.as_reader();
        let mut chunk = vec![0u8; READ_CHUNK];
        loop {
            let n = match reader.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(map_io_error(&e, ErrorCode::RecvError)),
            };
            trace!(len = n, "body chunk");
            body.write_body(&chunk[..n])?;
        }

        self.response_code = parts.status.as_u16();
        Ok(())
    }

    fn response_code(&self) -> u16 {
        self.response_code
    }
}

fn invalid(e: http::Error) -> RequestError {
    RequestError::transport(ErrorCode::BadFunctionArgument, e.to_string())
}

fn map_io_error(e: &io::Error, fallback: ErrorCode) -> RequestError {
    let code = match e.kind() {
        io::ErrorKind::TimedOut => ErrorCode::OperationTimedout,
        io::ErrorKind::ConnectionRefused => ErrorCode::CouldntConnect,
        _ => fallback,
    };
    RequestError::transport(code, e.to_string())
}

fn map_ureq_error(e: ureq::Error) -> RequestError {
    let code = match &e {
        ureq::Error::BadUri(_) => ErrorCode::UrlMalformat,
        ureq::Error::HostNotFound => ErrorCode::CouldntResolveHost,
        ureq::Error::ConnectionFailed => ErrorCode::CouldntConnect,
        ureq::Error::Timeout(_) => ErrorCode::OperationTimedout,
        ureq::Error::TooManyRedirects => ErrorCode::TooManyRedirects,
        ureq::Error::Io(io) => return map_io_error(io, ErrorCode::SendError),
        _ => ErrorCode::Other,
    };
    RequestError::transport(code, e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HeaderList;

    fn exchange<'a>(url: &'a str, headers: &'a HeaderList, body: Option<&'a [u8]>) -> Exchange<'a> {
        Exchange {
            url,
            method: Method::Post,
            headers,
            body,
            user_agent: "librequests/test",
        }
    }

    #[test]
    fn malformed_url_is_rejected_before_sending() {
        let headers = HeaderList::new();
        let err = UreqEngine::build_request(&exchange("not a url", &headers, None)).unwrap_err();
        assert_eq!(err.code(), ErrorCode::UrlMalformat);
    }

    #[test]
    fn non_http_scheme_is_unsupported() {
        let headers = HeaderList::new();
        let err = UreqEngine::build_request(&exchange("ftp://example.test/", &headers, None))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnsupportedProtocol);
    }

    #[test]
    fn form_content_type_added_only_for_bodies_without_one() {
        let empty = HeaderList::new();
        let req = UreqEngine::build_request(&exchange("http://example.test/", &empty, Some(b"a=1")))
            .unwrap()
            .body(())
            .unwrap();
        assert_eq!(req.headers()[http::header::CONTENT_TYPE], FORM_CONTENT_TYPE);
        assert_eq!(req.headers()[http::header::USER_AGENT], "librequests/test");

        let mut json = HeaderList::new();
        json.append("content-type: application/json").unwrap();
        let req = UreqEngine::build_request(&exchange("http://example.test/", &json, Some(b"{}")))
            .unwrap()
            .body(())
            .unwrap();
        assert_eq!(req.headers()[http::header::CONTENT_TYPE], "application/json");

        let req = UreqEngine::build_request(&exchange("http://example.test/", &empty, None))
            .unwrap()
            .body(())
            .unwrap();
        assert!(req.headers().get(http::header::CONTENT_TYPE).is_none());
    }

    #[test]
    fn custom_method_is_sent_verbatim() {
        let headers = HeaderList::new();
        let mut put = exchange("http://example.test/", &headers, None);
        put.method = Method::Custom("PUT");
        let req = UreqEngine::build_request(&put).unwrap().body(()).unwrap();
        assert_eq!(req.method().as_str(), "PUT");
    }

    #[test]
    fn header_lines_are_split_and_trimmed() {
        let mut headers = HeaderList::new();
        headers.append("X-Token:  abc ").unwrap();
        headers.append("garbage").unwrap();
        let req = UreqEngine::build_request(&exchange("http://example.test/", &headers, None))
            .unwrap()
            .body(())
            .unwrap();
        assert_eq!(req.headers()["x-token"], "abc");
        assert_eq!(req.headers().len(), 2);
    }

    #[test]
    fn io_errors_map_to_outcome_codes() {
        let refused = io::Error::from(io::ErrorKind::ConnectionRefused);
        assert_eq!(map_io_error(&refused, ErrorCode::SendError).code(), ErrorCode::CouldntConnect);
        let timed_out = io::Error::from(io::ErrorKind::TimedOut);
        assert_eq!(map_io_error(&timed_out, ErrorCode::RecvError).code(), ErrorCode::OperationTimedout);
        let other = io::Error::from(io::ErrorKind::UnexpectedEof);
        assert_eq!(map_io_error(&other, ErrorCode::RecvError).code(), ErrorCode::RecvError);
    }
}

//! HTTP test double for the request helper.
//!
//! Serves a handful of fixed endpoints so clients can be exercised end to end:
//! echoing what was sent, returning arbitrary status codes, and producing
//! bodies large enough to arrive in many chunks.

use std::collections::BTreeMap;

use axum::{
    body::Bytes,
    extract::Path,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Redirect},
    routing::{any, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::debug;
use uuid::Uuid;

/// Body served by `GET /get`.
pub const GREETING: &str = "hello from mock-server\n";

/// Largest body `GET /bytes/{n}` will produce.
pub const MAX_BYTES: usize = 16 * 1024 * 1024;

/// What the server saw, returned by the echo endpoints.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Echo {
    pub method: String,
    /// Header values keyed by lower-case name; repeated headers are joined
    /// with `", "`.
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

pub fn app() -> Router {
    Router::new()
        .route("/get", get(greeting))
        .route("/post", post(echo))
        .route("/put", put(echo))
        .route("/anything", any(echo))
        .route("/status/{code}", any(status))
        .route("/bytes/{n}", get(bytes))
        .route("/headers", get(many_headers))
        .route("/redirect", get(|| async { Redirect::to("/get") }))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn request_id() -> [(&'static str, String); 1] {
    [("x-request-id", Uuid::new_v4().to_string())]
}

async fn greeting() -> impl IntoResponse {
    (request_id(), GREETING)
}

async fn echo(method: Method, headers: HeaderMap, body: Bytes) -> impl IntoResponse {
    let mut seen: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in &headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        seen.entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    debug!(%method, body_len = body.len(), "echo");
    let echo = Echo {
        method: method.to_string(),
        headers: seen,
        body: String::from_utf8_lossy(&body).into_owned(),
    };
    (request_id(), Json(echo))
}

async fn status(Path(code): Path<u16>) -> Result<impl IntoResponse, StatusCode> {
    let status = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    if status.is_informational() {
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok((status, format!("status {code}\n")))
}

async fn bytes(Path(n): Path<usize>) -> Result<impl IntoResponse, StatusCode> {
    if n > MAX_BYTES {
        return Err(StatusCode::PAYLOAD_TOO_LARGE);
    }
    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        pattern(n),
    ))
}

/// Deterministic body for `GET /bytes/{n}`: byte `i` is `i % 251`, so zero
/// bytes appear throughout.
pub fn pattern(n: usize) -> Vec<u8> {
    (0..n).map(|i| (i % 251) as u8).collect()
}

async fn many_headers() -> impl IntoResponse {
    let mut headers = HeaderMap::new();
    headers.append("x-multi", HeaderValue::from_static("one"));
    headers.append("x-multi", HeaderValue::from_static("two"));
    headers.insert("x-single", HeaderValue::from_static("only"));
    (headers, "")
}

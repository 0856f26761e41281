//! Minimal synchronous HTTP request helper.
//!
//! # Overview
//! Executes GET, POST and PUT requests through a pluggable transport engine,
//! accumulating the streamed response body and header lines into a
//! caller-owned `RequestContext`, and reports the status code plus a simple
//! ok / not-ok verdict.
//!
//! # Design
//! - `Engine` is the transport seam. It pushes body chunks and header lines
//!   into `BodySink` / `HeaderSink` during one blocking `perform` call.
//! - `ByteAccumulator` and `HeaderCollector` are those sinks; both grow with
//!   fallible reservation so allocation failure surfaces as an error.
//! - `Client` runs the GET and shared POST/PUT pipelines and never owns
//!   response state; one `RequestContext` can be reset and reused across
//!   sequential requests.
//! - `UreqEngine` is the bundled engine.
//!
//! ```no_run
//! use requests_core::{Client, EngineConfig, RequestContext, UreqEngine};
//!
//! let mut client = Client::new(UreqEngine::new(&EngineConfig::from_env()));
//! let mut ctx = RequestContext::init();
//! client.get(&mut ctx, "http://localhost:3000/get")?;
//! println!("{} {}", ctx.status_code(), ctx.text());
//! # Ok::<(), requests_core::RequestError>(())
//! ```

pub mod agent;
pub mod body;
pub mod client;
pub mod config;
pub mod context;
pub mod encode;
pub mod engine;
pub mod error;
pub mod headers;
pub mod http;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use body::ByteAccumulator;
pub use client::{Client, PtMethod};
pub use config::EngineConfig;
pub use context::{RequestContext, Verdict};
pub use encode::{encode_key_values, percent_encode};
pub use engine::{BodySink, Engine, HeaderSink};
pub use error::{ErrorCode, RequestError};
pub use headers::{HeaderCollector, HeaderLine};
pub use http::{Exchange, HeaderList, Method};
pub use transport::UreqEngine;

//! Error types for request execution.
//!
//! # Design
//! Failures fall into two buckets. Allocation failures while growing one of
//! the context's buffers get their own variant so they can be reported as the
//! dedicated out-of-memory outcome. Everything the transport engine reports
//! is carried as `Transport` with an `ErrorCode` and a human-readable message.

use std::fmt;

use thiserror::Error;

/// Outcome codes reported by a transport engine.
///
/// Numbering follows the classic transport-library enumeration so codes
/// stay stable across the C boundary. `0` is reserved for success and is not
/// a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    UnsupportedProtocol,
    UrlMalformat,
    CouldntResolveHost,
    CouldntConnect,
    WriteError,
    OutOfMemory,
    OperationTimedout,
    BadFunctionArgument,
    TooManyRedirects,
    SendError,
    RecvError,
    Other,
}

impl ErrorCode {
    /// Returns the numeric outcome code.
    pub fn as_raw(self) -> i32 {
        match self {
            ErrorCode::UnsupportedProtocol => 1,
            ErrorCode::UrlMalformat => 3,
            ErrorCode::CouldntResolveHost => 6,
            ErrorCode::CouldntConnect => 7,
            ErrorCode::WriteError => 23,
            ErrorCode::OutOfMemory => 27,
            ErrorCode::OperationTimedout => 28,
            ErrorCode::BadFunctionArgument => 43,
            ErrorCode::TooManyRedirects => 47,
            ErrorCode::SendError => 55,
            ErrorCode::RecvError => 56,
            ErrorCode::Other => 99,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ErrorCode::UnsupportedProtocol => "unsupported protocol",
            ErrorCode::UrlMalformat => "malformed url",
            ErrorCode::CouldntResolveHost => "could not resolve host",
            ErrorCode::CouldntConnect => "could not connect",
            ErrorCode::WriteError => "failed writing received data",
            ErrorCode::OutOfMemory => "out of memory",
            ErrorCode::OperationTimedout => "operation timed out",
            ErrorCode::BadFunctionArgument => "bad function argument",
            ErrorCode::TooManyRedirects => "too many redirects",
            ErrorCode::SendError => "failed sending data",
            ErrorCode::RecvError => "failure receiving data",
            ErrorCode::Other => "transport failure",
        };
        f.write_str(text)
    }
}

/// Errors returned by the accumulators and the request pipelines.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Growing an owned buffer failed. The string names the buffer.
    #[error("out of memory while growing {0}")]
    OutOfMemory(&'static str),

    /// The transport engine did not complete the exchange.
    #[error("{code} ({}): {message}", .code.as_raw())]
    Transport { code: ErrorCode, message: String },
}

impl RequestError {
    pub fn transport(code: ErrorCode, message: impl Into<String>) -> Self {
        RequestError::Transport {
            code,
            message: message.into(),
        }
    }

    /// The outcome code this error is reported as.
    pub fn code(&self) -> ErrorCode {
        match self {
            RequestError::OutOfMemory(_) => ErrorCode::OutOfMemory,
            RequestError::Transport { code, .. } => *code,
        }
    }
}

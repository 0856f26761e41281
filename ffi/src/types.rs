//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! The context and the engine are opaque to C: callers only ever hold
//! pointers to them and read state back through accessor functions. Outcome
//! codes are a C enum whose discriminants match `ErrorCode::as_raw`, with `0`
//! for success.

use requests_core::{Client, ErrorCode, RequestContext, RequestError, UreqEngine};

/// Opaque transport handle returned by `requests_init`.
pub struct RequestsEngine {
    pub(crate) client: Client<UreqEngine>,
}

/// Opaque request context filled by the request functions.
pub struct RequestsContext {
    pub(crate) inner: RequestContext,
}

/// Outcome of a request call.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiOutcome {
    Ok = 0,
    UnsupportedProtocol = 1,
    UrlMalformat = 3,
    CouldntResolveHost = 6,
    CouldntConnect = 7,
    WriteError = 23,
    OutOfMemory = 27,
    OperationTimedout = 28,
    BadFunctionArgument = 43,
    TooManyRedirects = 47,
    SendError = 55,
    RecvError = 56,
    Other = 99,
}

impl From<ErrorCode> for FfiOutcome {
    fn from(code: ErrorCode) -> Self {
        match code {
            ErrorCode::UnsupportedProtocol => FfiOutcome::UnsupportedProtocol,
            ErrorCode::UrlMalformat => FfiOutcome::UrlMalformat,
            ErrorCode::CouldntResolveHost => FfiOutcome::CouldntResolveHost,
            ErrorCode::CouldntConnect => FfiOutcome::CouldntConnect,
            ErrorCode::WriteError => FfiOutcome::WriteError,
            ErrorCode::OutOfMemory => FfiOutcome::OutOfMemory,
            ErrorCode::OperationTimedout => FfiOutcome::OperationTimedout,
            ErrorCode::BadFunctionArgument => FfiOutcome::BadFunctionArgument,
            ErrorCode::TooManyRedirects => FfiOutcome::TooManyRedirects,
            ErrorCode::SendError => FfiOutcome::SendError,
            ErrorCode::RecvError => FfiOutcome::RecvError,
            ErrorCode::Other => FfiOutcome::Other,
        }
    }
}

impl From<Result<(), RequestError>> for FfiOutcome {
    fn from(result: Result<(), RequestError>) -> Self {
        match result {
            Ok(()) => FfiOutcome::Ok,
            Err(e) => e.code().into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discriminants_match_core_codes() {
        for code in [
            ErrorCode::UnsupportedProtocol,
            ErrorCode::UrlMalformat,
            ErrorCode::CouldntResolveHost,
            ErrorCode::CouldntConnect,
            ErrorCode::WriteError,
            ErrorCode::OutOfMemory,
            ErrorCode::OperationTimedout,
            ErrorCode::BadFunctionArgument,
            ErrorCode::TooManyRedirects,
            ErrorCode::SendError,
            ErrorCode::RecvError,
            ErrorCode::Other,
        ] {
            assert_eq!(FfiOutcome::from(code) as i32, code.as_raw(), "{code:?}");
        }
    }

    #[test]
    fn ok_result_is_zero() {
        assert_eq!(FfiOutcome::from(Ok(())) as i32, 0);
        let oom: Result<(), RequestError> = Err(RequestError::OutOfMemory("response body"));
        assert_eq!(FfiOutcome::from(oom), FfiOutcome::OutOfMemory);
    }
}

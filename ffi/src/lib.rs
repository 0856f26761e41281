//! C-ABI wrapper around `requests-core`.
//!
//! # Overview
//! Exposes the request helper through `extern "C"` functions shaped like a
//! classic C library: `requests_init` hands out a context and an engine
//! handle, the request functions fill the context, accessors read it back,
//! and `requests_close` / `requests_engine_free` release everything.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind`, argument
//!   parsing included, so panics never cross the FFI boundary.
//! - Request functions return an `FfiOutcome`; `0` is success.
//! - Strings returned by accessors point into the context and stay valid until
//!   the next request, `requests_reset` or `requests_close` on that context.
//!   Only `requests_url_encode` returns an owned string, freed with
//!   `requests_free_string`.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int, c_long};
use std::panic::{catch_unwind, AssertUnwindSafe};

use requests_core::{Client, EngineConfig, PtMethod, RequestContext, RequestError, UreqEngine};
use tracing::error;

use types::*;

/// Borrow a C string as UTF-8. `None` for null or invalid UTF-8.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that outlives `'a`.
unsafe fn utf8<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

/// Borrow `count` C strings from `array`. `None` if any entry is null or not
/// UTF-8.
///
/// # Safety
/// `array` must point to `count` valid string pointers.
unsafe fn utf8_array<'a>(array: *const *const c_char, count: usize) -> Option<Vec<&'a str>> {
    let ptrs = unsafe { std::slice::from_raw_parts(array, count) };
    ptrs.iter().map(|&p| unsafe { utf8(p) }).collect()
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// Create a fresh context in `*ctx` and return a new engine handle.
///
/// The engine reads `REQUESTS_TIMEOUT_SECS` and `REQUESTS_MAX_REDIRECTS` from
/// the environment. Returns null (and leaves `*ctx` untouched) if `ctx` is
/// null. Release with `requests_close` and `requests_engine_free`.
#[unsafe(no_mangle)]
pub extern "C" fn requests_init(ctx: *mut *mut RequestsContext) -> *mut RequestsEngine {
    catch_unwind(AssertUnwindSafe(|| {
        if ctx.is_null() {
            return std::ptr::null_mut();
        }
        let context = Box::new(RequestsContext {
            inner: RequestContext::init(),
        });
        unsafe { *ctx = Box::into_raw(context) };

        let engine = UreqEngine::new(&EngineConfig::from_env());
        Box::into_raw(Box::new(RequestsEngine {
            client: Client::new(engine),
        }))
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Release a context and every buffer it owns. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn requests_close(ctx: *mut RequestsContext) {
    if !ctx.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            let ctx = unsafe { Box::from_raw(ctx) };
            ctx.inner.close();
        }));
    }
}

/// Free an engine handle returned by `requests_init`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn requests_engine_free(engine: *mut RequestsEngine) {
    if !engine.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(engine) });
        }));
    }
}

/// Discard everything a previous request left in `ctx` so it can be reused.
#[unsafe(no_mangle)]
pub extern "C" fn requests_reset(ctx: *mut RequestsContext) {
    if !ctx.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            unsafe { &mut *ctx }.inner.reset();
        }));
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Run `f` with any panic turned into `FfiOutcome::Other`. Argument parsing
/// happens inside `f`.
fn guarded(name: &str, f: impl FnOnce() -> FfiOutcome) -> FfiOutcome {
    catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|_| {
        error!(function = name, "panic caught at FFI boundary");
        FfiOutcome::Other
    })
}

fn run(
    engine: *mut RequestsEngine,
    ctx: *mut RequestsContext,
    f: impl FnOnce(&mut Client<UreqEngine>, &mut RequestContext) -> Result<(), RequestError>,
) -> FfiOutcome {
    if engine.is_null() || ctx.is_null() {
        return FfiOutcome::BadFunctionArgument;
    }
    let engine = unsafe { &mut *engine };
    let ctx = unsafe { &mut *ctx };
    FfiOutcome::from(f(&mut engine.client, &mut ctx.inner))
}

#[allow(clippy::too_many_arguments)]
fn pt(
    name: &str,
    engine: *mut RequestsEngine,
    ctx: *mut RequestsContext,
    url: *const c_char,
    data: *const c_char,
    custom_hdrv: *const *const c_char,
    custom_hdrc: c_int,
    method: PtMethod,
) -> FfiOutcome {
    guarded(name, || {
        let Some(url) = (unsafe { utf8(url) }) else {
            return FfiOutcome::BadFunctionArgument;
        };
        let body = if data.is_null() {
            None
        } else {
            Some(unsafe { CStr::from_ptr(data) }.to_bytes())
        };
        let headers = if custom_hdrv.is_null() {
            None
        } else {
            let Ok(count) = usize::try_from(custom_hdrc) else {
                return FfiOutcome::BadFunctionArgument;
            };
            match unsafe { utf8_array(custom_hdrv, count) } {
                Some(headers) => Some(headers),
                None => return FfiOutcome::BadFunctionArgument,
            }
        };

        run(engine, ctx, |client, ctx| {
            client.pt(ctx, url, body, headers.as_deref(), method)
        })
    })
}

/// Perform a GET request, filling `ctx` with the response.
#[unsafe(no_mangle)]
pub extern "C" fn requests_get(
    engine: *mut RequestsEngine,
    ctx: *mut RequestsContext,
    url: *const c_char,
) -> FfiOutcome {
    guarded("requests_get", || {
        let Some(url) = (unsafe { utf8(url) }) else {
            return FfiOutcome::BadFunctionArgument;
        };
        run(engine, ctx, |client, ctx| client.get(ctx, url))
    })
}

/// POST `data` (already encoded, may be null for an empty body).
#[unsafe(no_mangle)]
pub extern "C" fn requests_post(
    engine: *mut RequestsEngine,
    ctx: *mut RequestsContext,
    url: *const c_char,
    data: *const c_char,
) -> FfiOutcome {
    pt("requests_post", engine, ctx, url, data, std::ptr::null(), 0, PtMethod::Post)
}

/// PUT `data` (already encoded, may be null for an empty body).
#[unsafe(no_mangle)]
pub extern "C" fn requests_put(
    engine: *mut RequestsEngine,
    ctx: *mut RequestsContext,
    url: *const c_char,
    data: *const c_char,
) -> FfiOutcome {
    pt("requests_put", engine, ctx, url, data, std::ptr::null(), 0, PtMethod::Put)
}

/// POST with `custom_hdrc` extra `Name: value` lines from `custom_hdrv`.
#[unsafe(no_mangle)]
pub extern "C" fn requests_post_headers(
    engine: *mut RequestsEngine,
    ctx: *mut RequestsContext,
    url: *const c_char,
    data: *const c_char,
    custom_hdrv: *const *const c_char,
    custom_hdrc: c_int,
) -> FfiOutcome {
    pt(
        "requests_post_headers",
        engine,
        ctx,
        url,
        data,
        custom_hdrv,
        custom_hdrc,
        PtMethod::Post,
    )
}

/// PUT with `custom_hdrc` extra `Name: value` lines from `custom_hdrv`.
#[unsafe(no_mangle)]
pub extern "C" fn requests_put_headers(
    engine: *mut RequestsEngine,
    ctx: *mut RequestsContext,
    url: *const c_char,
    data: *const c_char,
    custom_hdrv: *const *const c_char,
    custom_hdrc: c_int,
) -> FfiOutcome {
    pt(
        "requests_put_headers",
        engine,
        ctx,
        url,
        data,
        custom_hdrv,
        custom_hdrc,
        PtMethod::Put,
    )
}

/// Encode `data_size` alternating keys and values as a percent-encoded
/// `k=v&k=v` string.
///
/// Returns null if `data_size` is odd or negative, or an argument is null.
/// Free the result with `requests_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn requests_url_encode(
    engine: *const RequestsEngine,
    data: *const *const c_char,
    data_size: c_int,
) -> *mut c_char {
    catch_unwind(AssertUnwindSafe(|| {
        if engine.is_null() || (data.is_null() && data_size != 0) {
            return std::ptr::null_mut();
        }
        let Ok(count) = usize::try_from(data_size) else {
            return std::ptr::null_mut();
        };
        let pairs: Vec<&[u8]> = if count == 0 {
            Vec::new()
        } else {
            let ptrs = unsafe { std::slice::from_raw_parts(data, count) };
            if ptrs.iter().any(|p| p.is_null()) {
                return std::ptr::null_mut();
            }
            ptrs.iter()
                .map(|&p| unsafe { CStr::from_ptr(p) }.to_bytes())
                .collect()
        };
        let engine = unsafe { &*engine };
        engine
            .client
            .encode_key_values(&pairs)
            .and_then(|encoded| CString::new(encoded).ok())
            .map_or(std::ptr::null_mut(), CString::into_raw)
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Free a string returned by `requests_url_encode`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn requests_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Accessors
// ---------------------------------------------------------------------------

fn with_ctx<T>(ctx: *const RequestsContext, default: T, f: impl FnOnce(&RequestContext) -> T) -> T {
    if ctx.is_null() {
        return default;
    }
    catch_unwind(AssertUnwindSafe(|| f(&unsafe { &*ctx }.inner))).unwrap_or(default)
}

/// HTTP status of the last completed request, 0 if none.
#[unsafe(no_mangle)]
pub extern "C" fn requests_status_code(ctx: *const RequestsContext) -> c_long {
    with_ctx(ctx, 0, |c| c_long::from(c.status_code()))
}

/// 1 if the last request completed with `0 < status < 400`, 0 if not, -1 if no
/// request has completed.
#[unsafe(no_mangle)]
pub extern "C" fn requests_ok(ctx: *const RequestsContext) -> c_int {
    with_ctx(ctx, -1, |c| c.verdict().as_raw())
}

/// NUL-terminated response body. May contain earlier NUL bytes; use
/// `requests_size` for the real length.
#[unsafe(no_mangle)]
pub extern "C" fn requests_text(ctx: *const RequestsContext) -> *const c_char {
    with_ctx(ctx, std::ptr::null(), |c| {
        c.body().as_bytes_with_nul().as_ptr().cast()
    })
}

/// Number of body bytes received.
#[unsafe(no_mangle)]
pub extern "C" fn requests_size(ctx: *const RequestsContext) -> usize {
    with_ctx(ctx, 0, RequestContext::size)
}

#[unsafe(no_mangle)]
pub extern "C" fn requests_resp_header_count(ctx: *const RequestsContext) -> usize {
    with_ctx(ctx, 0, |c| c.response_headers().len())
}

/// Response header line `index`, including its trailing CRLF. Null when out of
/// range.
#[unsafe(no_mangle)]
pub extern "C" fn requests_resp_header(ctx: *const RequestsContext, index: usize) -> *const c_char {
    with_ctx(ctx, std::ptr::null(), |c| {
        c.response_headers()
            .get(index)
            .map_or(std::ptr::null(), |h| h.as_bytes_with_nul().as_ptr().cast())
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn requests_req_header_count(ctx: *const RequestsContext) -> usize {
    with_ctx(ctx, 0, |c| c.request_headers().len())
}

/// Custom request header `index` as sent by the caller. Null when out of range.
#[unsafe(no_mangle)]
pub extern "C" fn requests_req_header(ctx: *const RequestsContext, index: usize) -> *const c_char {
    with_ctx(ctx, std::ptr::null(), |c| {
        c.request_headers()
            .get(index)
            .map_or(std::ptr::null(), |h| h.as_bytes_with_nul().as_ptr().cast())
    })
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

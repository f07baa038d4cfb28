//! C-ABI wrapper around `formreq-core`.
//!
//! # Overview
//! Exposes `RequestClient` through `extern "C"` functions so a host written
//! in any language with a C FFI can configure a client, send GET/POST
//! requests synchronously or asynchronously, and receive results through a
//! pair of C callbacks (`FfiResultListener`).
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - `formreq_send` mirrors `RequestClient::send`: synchronous success
//!   returns the body as an owned C string, everything else goes to the
//!   listener. `formreq_execute` returns an `FfiOutcome` envelope instead.
//! - The C caller owns all returned pointers and must call the matching
//!   `formreq_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use formreq_core::{ParamSet, RequestClient};
use tracing::warn;

use types::*;

/// Borrow a C string as `&str`. Null or invalid UTF-8 yields `None`.
fn borrow_str<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(s) }.to_str().ok()
}

/// Clone the parameters behind `params`; null means no parameters.
fn params_or_empty(params: *const FfiParamSet) -> ParamSet {
    if params.is_null() {
        ParamSet::new()
    } else {
        unsafe { &*params }.inner.clone()
    }
}

// ---------------------------------------------------------------------------
// Client lifecycle and configuration
// ---------------------------------------------------------------------------

/// Create a new client bound to `server_url`.
///
/// Returns null if `server_url` is null or not UTF-8.
/// The caller must free the returned pointer with `formreq_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn formreq_client_new(server_url: *const c_char) -> *mut FfiRequestClient {
    catch_unwind(|| {
        let Some(url) = borrow_str(server_url) else {
            return std::ptr::null_mut();
        };
        Box::into_raw(Box::new(FfiRequestClient {
            inner: RequestClient::new(url),
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `formreq_client_new`. Safe to call with null.
///
/// Asynchronous requests already dispatched keep running and still call
/// their listener.
#[unsafe(no_mangle)]
pub extern "C" fn formreq_client_free(client: *mut FfiRequestClient) {
    if !client.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(client) });
        }));
    }
}

/// Set the server URL for subsequent requests. Returns false on null or
/// non-UTF-8 input.
#[unsafe(no_mangle)]
pub extern "C" fn formreq_client_set_server_url(
    client: *const FfiRequestClient,
    server_url: *const c_char,
) -> bool {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return false;
        }
        let Some(url) = borrow_str(server_url) else {
            return false;
        };
        unsafe { &*client }.inner.set_server_url(url);
        true
    }))
    .unwrap_or(false)
}

/// Set the connection timeout in milliseconds (0 disables it).
#[unsafe(no_mangle)]
pub extern "C" fn formreq_client_set_connection_timeout(
    client: *const FfiRequestClient,
    ms: u64,
) -> bool {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return false;
        }
        unsafe { &*client }.inner.set_connection_timeout(ms);
        true
    }))
    .unwrap_or(false)
}

/// Set the socket timeout in milliseconds (0 waits forever).
#[unsafe(no_mangle)]
pub extern "C" fn formreq_client_set_socket_timeout(
    client: *const FfiRequestClient,
    ms: u64,
) -> bool {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return false;
        }
        unsafe { &*client }.inner.set_socket_timeout(ms);
        true
    }))
    .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Create an empty parameter set. Free it with `formreq_params_free`.
#[unsafe(no_mangle)]
pub extern "C" fn formreq_params_new() -> *mut FfiParamSet {
    Box::into_raw(Box::new(FfiParamSet {
        inner: ParamSet::new(),
    }))
}

/// Build a parameter set from a JSON object.
///
/// Returns null if `json` is null, not valid JSON, or not an object.
#[unsafe(no_mangle)]
pub extern "C" fn formreq_params_from_json(json: *const c_char) -> *mut FfiParamSet {
    catch_unwind(|| {
        let Some(json) = borrow_str(json) else {
            return std::ptr::null_mut();
        };
        match ParamSet::from_json_str(json) {
            Ok(inner) => Box::into_raw(Box::new(FfiParamSet { inner })),
            Err(err) => {
                warn!("rejected JSON parameters: {err}");
                std::ptr::null_mut()
            }
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Insert or replace a field. Returns false on null or non-UTF-8 input.
#[unsafe(no_mangle)]
pub extern "C" fn formreq_params_insert(
    params: *mut FfiParamSet,
    key: *const c_char,
    value: *const c_char,
) -> bool {
    catch_unwind(AssertUnwindSafe(|| {
        if params.is_null() {
            return false;
        }
        let (Some(key), Some(value)) = (borrow_str(key), borrow_str(value)) else {
            return false;
        };
        unsafe { &mut *params }.inner.insert(key, value);
        true
    }))
    .unwrap_or(false)
}

/// Free a parameter set. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn formreq_params_free(params: *mut FfiParamSet) {
    if !params.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(params) });
        }));
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Build the request descriptor a send would dispatch, without sending it.
///
/// `params` may be null for no parameters. Returns null if `client` is null
/// or the request cannot be built (for example, no server URL is set).
/// Free the result with `formreq_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn formreq_build_request(
    client: *const FfiRequestClient,
    method: FfiHttpMethod,
    params: *const FfiParamSet,
) -> *mut FfiHttpRequest {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        match client.inner.build_request(method.into(), &params_or_empty(params)) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Send a request.
///
/// `params` is copied and may be null for no parameters; the caller keeps
/// ownership. In `Sync` mode a successful body is returned (free it with
/// `formreq_free_string`) and failures go to `listener.on_error`, with null
/// returned. In `Async` mode null is returned at once and exactly one
/// listener callback follows from a worker thread.
///
/// A null `client`, or a panic while the request runs on the calling thread,
/// reports a connection error to the listener.
#[unsafe(no_mangle)]
pub extern "C" fn formreq_send(
    client: *const FfiRequestClient,
    method: FfiHttpMethod,
    params: *const FfiParamSet,
    mode: FfiExecutionMode,
    listener: FfiResultListener,
) -> *mut c_char {
    let bridge = Arc::new(ListenerBridge(listener));
    let result = catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            formreq_core::ResultListener::on_error(
                bridge.as_ref(),
                "Connection Error: null argument: client",
            );
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let body = client.inner.send(
            method.into(),
            params_or_empty(params),
            mode.into(),
            bridge.clone(),
        );
        match body {
            Some(body) => types::to_c_string(&body).into_raw(),
            None => std::ptr::null_mut(),
        }
    }));
    result.unwrap_or_else(|_| {
        formreq_core::ResultListener::on_error(
            bridge.as_ref(),
            "Connection Error: panic in formreq_send",
        );
        std::ptr::null_mut()
    })
}

/// Run a request on the calling thread and return its outcome envelope.
///
/// Free the result with `formreq_free_outcome`.
#[unsafe(no_mangle)]
pub extern "C" fn formreq_execute(
    client: *const FfiRequestClient,
    method: FfiHttpMethod,
    params: *const FfiParamSet,
) -> *mut FfiOutcome {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiOutcome::null_arg("client");
        }
        let client = unsafe { &*client };
        match client
            .inner
            .execute(method.into(), &params_or_empty(params))
            .into_result()
        {
            Ok(body) => FfiOutcome::success(&body),
            Err(err) => FfiOutcome::from_error(&err),
        }
    }))
    .unwrap_or_else(|_| FfiOutcome::panic("panic in formreq_execute"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by `formreq_build_request`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn formreq_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        if !req.url.is_null() {
            drop(unsafe { CString::from_raw(req.url) });
        }
        if !req.body.is_null() {
            drop(unsafe { CString::from_raw(req.body) });
        }
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    req.headers,
                    req.headers_len as usize,
                ))
            };
            for h in headers.iter() {
                if !h.key.is_null() {
                    drop(unsafe { CString::from_raw(h.key) });
                }
                if !h.value.is_null() {
                    drop(unsafe { CString::from_raw(h.value) });
                }
            }
        }
    });
}

/// Free an `FfiOutcome` returned by `formreq_execute`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn formreq_free_outcome(outcome: *mut FfiOutcome) {
    if outcome.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let outcome = unsafe { Box::from_raw(outcome) };
        if !outcome.body.is_null() {
            drop(unsafe { CString::from_raw(outcome.body) });
        }
        if !outcome.message.is_null() {
            drop(unsafe { CString::from_raw(outcome.message) });
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn formreq_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

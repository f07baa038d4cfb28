//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! enums with explicit discriminants. Conversion functions live here to keep
//! `lib.rs` focused on the `extern "C"` surface.

use std::ffi::{c_void, CString};
use std::os::raw::c_char;

use formreq_core::{ErrorKind, ExecutionMode, HttpMethod, ParamSet, RequestError, ResultListener};

/// Opaque handle to a `RequestClient`.
pub struct FfiRequestClient {
    pub(crate) inner: formreq_core::RequestClient,
}

/// Opaque handle to a `ParamSet` under construction.
pub struct FfiParamSet {
    pub(crate) inner: ParamSet,
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
}

impl From<FfiHttpMethod> for HttpMethod {
    fn from(m: FfiHttpMethod) -> Self {
        match m {
            FfiHttpMethod::Get => HttpMethod::Get,
            FfiHttpMethod::Post => HttpMethod::Post,
        }
    }
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiExecutionMode {
    Sync = 0,
    Async = 1,
}

impl From<FfiExecutionMode> for ExecutionMode {
    fn from(m: FfiExecutionMode) -> Self {
        match m {
            FfiExecutionMode::Sync => ExecutionMode::Sync,
            FfiExecutionMode::Async => ExecutionMode::Async,
        }
    }
}

/// Outcome codes returned in `FfiOutcome`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Encoding = 1,
    Server = 2,
    ConnectTimeout = 3,
    SocketTimeout = 4,
    Protocol = 5,
    Connection = 6,
    NullArg = 7,
    Panic = 8,
}

impl From<ErrorKind> for FfiErrorCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Encoding => FfiErrorCode::Encoding,
            ErrorKind::Server => FfiErrorCode::Server,
            ErrorKind::ConnectTimeout => FfiErrorCode::ConnectTimeout,
            ErrorKind::SocketTimeout => FfiErrorCode::SocketTimeout,
            ErrorKind::Protocol => FfiErrorCode::Protocol,
            ErrorKind::Connection => FfiErrorCode::Connection,
        }
    }
}

// ---------------------------------------------------------------------------
// Strings
// ---------------------------------------------------------------------------

/// Convert to a C string, dropping interior NUL bytes that C cannot carry.
pub(crate) fn to_c_string(s: &str) -> CString {
    CString::new(s).unwrap_or_else(|_| {
        let cleaned: String = s.chars().filter(|&c| c != '\0').collect();
        CString::new(cleaned).unwrap_or_default()
    })
}

// ---------------------------------------------------------------------------
// Listener
// ---------------------------------------------------------------------------

pub type FfiCallback = Option<extern "C" fn(user_data: *mut c_void, text: *const c_char)>;

/// Result listener implemented by the C caller.
///
/// The text pointer passed to a callback is only valid for the duration of
/// that call. Asynchronous sends invoke the callbacks from a worker thread,
/// so `user_data` must be safe to use from any thread until the callback
/// has run.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct FfiResultListener {
    pub user_data: *mut c_void,
    pub on_response: FfiCallback,
    pub on_error: FfiCallback,
}

/// Bridges an `FfiResultListener` to the core `ResultListener` trait.
pub(crate) struct ListenerBridge(pub(crate) FfiResultListener);

// SAFETY: the C caller promises `user_data` and the callbacks may be used
// from any thread (see `FfiResultListener`).
unsafe impl Send for ListenerBridge {}
unsafe impl Sync for ListenerBridge {}

impl ListenerBridge {
    fn call(&self, callback: FfiCallback, text: &str) {
        if let Some(callback) = callback {
            let text = to_c_string(text);
            callback(self.0.user_data, text.as_ptr());
        }
    }
}

impl ResultListener for ListenerBridge {
    fn on_response(&self, body: &str) {
        self.call(self.0.on_response, body);
    }

    fn on_error(&self, message: &str) {
        self.call(self.0.on_error, message);
    }
}

// ---------------------------------------------------------------------------
// Request descriptor
// ---------------------------------------------------------------------------

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// A request descriptor as C-compatible plain data. `body` is null for GET.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: formreq_core::HttpRequest) -> *mut Self {
        let url = to_c_string(&req.url).into_raw();
        let body = match req.body_str() {
            Some(b) => to_c_string(b).into_raw(),
            None => std::ptr::null_mut(),
        };

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .iter()
                .map(|(k, v)| FfiHeader {
                    key: to_c_string(k).into_raw(),
                    value: to_c_string(v).into_raw(),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url,
            headers,
            headers_len,
            body,
        }))
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Result envelope for `formreq_execute`.
///
/// On success `code` is `Ok`, `body` holds the response text and `message`
/// is null. On failure `body` is null, `message` is the same text a listener
/// would receive, and `http_status` is set for `Server` failures.
#[repr(C)]
pub struct FfiOutcome {
    pub code: FfiErrorCode,
    pub http_status: u16,
    pub body: *mut c_char,
    pub message: *mut c_char,
}

impl FfiOutcome {
    pub(crate) fn success(body: &str) -> *mut Self {
        Box::into_raw(Box::new(FfiOutcome {
            code: FfiErrorCode::Ok,
            http_status: 200,
            body: to_c_string(body).into_raw(),
            message: std::ptr::null_mut(),
        }))
    }

    pub(crate) fn from_error(err: &RequestError) -> *mut Self {
        Self::failure(
            err.kind().into(),
            err.status().unwrap_or(0),
            &err.to_string(),
        )
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::failure(FfiErrorCode::NullArg, 0, &format!("null argument: {name}"))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::failure(FfiErrorCode::Panic, 0, msg)
    }

    fn failure(code: FfiErrorCode, http_status: u16, message: &str) -> *mut Self {
        Box::into_raw(Box::new(FfiOutcome {
            code,
            http_status,
            body: std::ptr::null_mut(),
            message: to_c_string(message).into_raw(),
        }))
    }
}

//! Request descriptors and the pure request builder.
//!
//! # Design
//! An `HttpRequest` is the complete, side-effect-free description of one
//! exchange: target URL, method, headers and optional form body. It is built
//! from already-encoded parameters by `build_request` and handed to a
//! `Transport` for execution. `HttpResponse` is the raw status and body a
//! transport reads back.
//!
//! All fields use owned types so descriptors can move onto worker threads and
//! across the C boundary without lifetime concerns.

use std::fmt;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
        }
    }
}

/// A request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// Form body, present for POST only.
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Body as text. Bodies built here are always valid UTF-8.
    pub fn body_str(&self) -> Option<&str> {
        self.body
            .as_deref()
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
    }
}

/// A response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Build the descriptor for `method` against `base_url`.
///
/// GET appends `encoded_params` as the query string (with `&` if `base_url`
/// already has one, and nothing at all when there are no parameters). POST
/// targets `base_url` unchanged and carries the parameters as a form body.
pub fn build_request(method: HttpMethod, base_url: &str, encoded_params: &str) -> HttpRequest {
    match method {
        HttpMethod::Get => {
            let url = if encoded_params.is_empty() {
                base_url.to_string()
            } else {
                let separator = if base_url.contains('?') { '&' } else { '?' };
                format!("{base_url}{separator}{encoded_params}")
            };
            HttpRequest {
                method,
                url,
                headers: Vec::new(),
                body: None,
            }
        }
        HttpMethod::Post => HttpRequest {
            method,
            url: base_url.to_string(),
            headers: vec![("content-type".to_string(), FORM_CONTENT_TYPE.to_string())],
            body: Some(encoded_params.as_bytes().to_vec()),
        },
    }
}

//! Error types for the form request client.
//!
//! # Design
//! Every failure a request can run into maps to exactly one `RequestError`
//! variant, and `ErrorKind` names the variant without its payload. The
//! `Display` text of a `RequestError` is what a `ResultListener` receives in
//! `on_error`; a non-200 reply always displays as the bare `"Server Error"`
//! while its status code stays available through `RequestError::status`.

use thiserror::Error;

/// Category of a failed request, without the diagnostic detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The parameter set could not be form-encoded.
    Encoding,
    /// The server answered with a status other than 200.
    Server,
    /// The connect phase exceeded the connection timeout.
    ConnectTimeout,
    /// Waiting for response data exceeded the socket timeout.
    SocketTimeout,
    /// The peer violated the HTTP protocol.
    Protocol,
    /// Any other I/O failure.
    Connection,
}

/// A classified request failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("Encoding Error: {0}")]
    Encoding(String),

    /// Non-200 reply. The status is kept for logging only.
    #[error("Server Error")]
    Server { status: u16 },

    #[error("Connect Timeout: {0}")]
    ConnectTimeout(String),

    #[error("Socket Timeout: {0}")]
    SocketTimeout(String),

    #[error("HTTP Error: {0}")]
    Protocol(String),

    #[error("Connection Error: {0}")]
    Connection(String),
}

impl RequestError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RequestError::Encoding(_) => ErrorKind::Encoding,
            RequestError::Server { .. } => ErrorKind::Server,
            RequestError::ConnectTimeout(_) => ErrorKind::ConnectTimeout,
            RequestError::SocketTimeout(_) => ErrorKind::SocketTimeout,
            RequestError::Protocol(_) => ErrorKind::Protocol,
            RequestError::Connection(_) => ErrorKind::Connection,
        }
    }

    /// The underlying diagnostic message. For `Server` this is `"Server Error"`.
    pub fn detail(&self) -> &str {
        match self {
            RequestError::Server { .. } => "Server Error",
            RequestError::Encoding(detail)
            | RequestError::ConnectTimeout(detail)
            | RequestError::SocketTimeout(detail)
            | RequestError::Protocol(detail)
            | RequestError::Connection(detail) => detail,
        }
    }

    /// HTTP status of a `Server` failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Server { status } => Some(*status),
            _ => None,
        }
    }
}

/// Errors raised while loading a `RequestConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}: expected milliseconds as an unsigned integer")]
    InvalidTimeout { var: String, value: String },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

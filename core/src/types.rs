//! Per-request value types: how a request runs and how it ended.

use crate::error::RequestError;
use crate::listener::ResultListener;

/// How `RequestClient::send` runs a request.
///
/// Has no default; blocking the calling thread must be requested explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Block the calling thread until the outcome is known.
    Sync,
    /// Return immediately; the outcome reaches the listener later.
    Async,
}

/// The single result of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseOutcome {
    Success { body: String },
    Failure(RequestError),
}

impl ResponseOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ResponseOutcome::Success { .. })
    }

    pub fn into_result(self) -> Result<String, RequestError> {
        match self {
            ResponseOutcome::Success { body } => Ok(body),
            ResponseOutcome::Failure(err) => Err(err),
        }
    }

    /// Hand the outcome to `listener`: `on_response` for a body,
    /// `on_error` with the error's display text otherwise.
    pub fn deliver(self, listener: &dyn ResultListener) {
        match self {
            ResponseOutcome::Success { body } => listener.on_response(&body),
            ResponseOutcome::Failure(err) => listener.on_error(&err.to_string()),
        }
    }
}

impl From<Result<String, RequestError>> for ResponseOutcome {
    fn from(result: Result<String, RequestError>) -> Self {
        match result {
            Ok(body) => ResponseOutcome::Success { body },
            Err(err) => ResponseOutcome::Failure(err),
        }
    }
}

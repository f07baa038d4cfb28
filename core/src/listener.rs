//! Callback contract through which request outcomes are reported.
//!
//! # Design
//! The listener is passed explicitly to every `send`, so any type can receive
//! results. Implementations must be `Send + Sync` because asynchronous
//! requests call them from a worker thread; callers with thread-affinity
//! requirements (a UI loop, say) forward from there themselves.

use std::sync::Arc;

/// Receives the outcome of a request.
///
/// For any single request exactly one of the two methods is called, at most
/// once. In synchronous mode a successful body is returned to the caller
/// instead and `on_response` is not called.
pub trait ResultListener: Send + Sync {
    fn on_response(&self, body: &str);
    fn on_error(&self, message: &str);
}

impl<L: ResultListener + ?Sized> ResultListener for Arc<L> {
    fn on_response(&self, body: &str) {
        (**self).on_response(body)
    }

    fn on_error(&self, message: &str) {
        (**self).on_error(message)
    }
}

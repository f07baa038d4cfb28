//! Background execution for `ExecutionMode::Async`.
//!
//! Each request gets its own named worker thread. The worker runs the same
//! synchronous path as a `Sync` send and then delivers the outcome to the
//! listener, so the listener is called exactly once and only after the
//! exchange has finished. The caller never waits on the worker.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use tracing::{debug, error};

use crate::client::perform;
use crate::config::RequestConfig;
use crate::error::RequestError;
use crate::http::HttpMethod;
use crate::listener::ResultListener;
use crate::params::ParamSet;
use crate::transport::Transport;
use crate::types::ResponseOutcome;

pub struct AsyncExecutor {
    transport: Arc<dyn Transport>,
    next_worker: AtomicUsize,
}

impl AsyncExecutor {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            next_worker: AtomicUsize::new(0),
        }
    }

    /// Run one request off the calling thread and report it to `listener`.
    ///
    /// If no worker thread can be started the listener receives a
    /// `Connection` error instead, still exactly once.
    pub fn run(
        &self,
        method: HttpMethod,
        params: ParamSet,
        config: RequestConfig,
        listener: Arc<dyn ResultListener>,
    ) {
        let id = self.next_worker.fetch_add(1, Ordering::Relaxed);
        let transport = Arc::clone(&self.transport);
        let worker_listener = Arc::clone(&listener);

        let spawned = thread::Builder::new()
            .name(format!("formreq-worker-{id}"))
            .spawn(move || {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                    perform(transport.as_ref(), &config, method, &params)
                }))
                .unwrap_or_else(|payload| {
                    let reason = panic_message(payload.as_ref());
                    error!(worker = id, "worker panicked: {reason}");
                    ResponseOutcome::Failure(RequestError::Connection(format!(
                        "worker panicked: {reason}"
                    )))
                });
                debug!(worker = id, success = outcome.is_success(), "worker finished");
                outcome.deliver(worker_listener.as_ref());
            });

        if let Err(err) = spawned {
            error!(worker = id, "failed to spawn worker: {err}");
            ResponseOutcome::Failure(RequestError::Connection(format!(
                "failed to spawn worker: {err}"
            )))
            .deliver(listener.as_ref());
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}

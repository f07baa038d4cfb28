//! The public request client.
//!
//! # Design
//! `RequestClient` owns its `RequestConfig` behind a lock so it can be shared
//! between threads and reconfigured through `&self`. Every `send` takes a
//! snapshot of the configuration first; setter calls made afterwards only
//! affect later requests. A request runs in three fixed steps: encode the
//! parameters, build the descriptor, execute it on the transport. Failures
//! in the first two steps short-circuit before any network call.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info, warn};

use crate::config::RequestConfig;
use crate::error::RequestError;
use crate::executor::AsyncExecutor;
use crate::http::{build_request, HttpMethod, HttpRequest};
use crate::listener::ResultListener;
use crate::params::{self, ParamSet};
use crate::transport::{self, Transport, UreqTransport};
use crate::types::{ExecutionMode, ResponseOutcome};

/// Sends form-encoded GET/POST requests to a single configured endpoint.
pub struct RequestClient {
    config: RwLock<RequestConfig>,
    transport: Arc<dyn Transport>,
    executor: AsyncExecutor,
}

impl RequestClient {
    pub fn new(server_url: &str) -> Self {
        Self::with_config(RequestConfig::new(server_url))
    }

    pub fn with_config(config: RequestConfig) -> Self {
        Self::with_transport(config, Arc::new(UreqTransport))
    }

    /// Use `transport` instead of the default `ureq` transport.
    pub fn with_transport(config: RequestConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config: RwLock::new(config),
            executor: AsyncExecutor::new(Arc::clone(&transport)),
            transport,
        }
    }

    pub fn set_server_url(&self, url: &str) {
        info!(url, "set server url");
        self.update(|config| config.server_url = url.to_string());
    }

    /// Limit on establishing a connection. `0` disables it.
    pub fn set_connection_timeout(&self, ms: u64) {
        info!(ms, "set connection timeout");
        self.update(|config| config.connection_timeout_ms = ms);
    }

    /// Limit on waiting for response data. `0` waits forever.
    pub fn set_socket_timeout(&self, ms: u64) {
        info!(ms, "set socket timeout");
        self.update(|config| config.socket_timeout_ms = ms);
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> RequestConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn update(&self, apply: impl FnOnce(&mut RequestConfig)) {
        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
        apply(&mut config);
    }

    /// Build the descriptor `send` would dispatch, without sending it.
    pub fn build_request(
        &self,
        method: HttpMethod,
        params: &ParamSet,
    ) -> Result<HttpRequest, RequestError> {
        prepare(&self.config(), method, params)
    }

    /// Run a request on the calling thread and return its outcome.
    pub fn execute(&self, method: HttpMethod, params: &ParamSet) -> ResponseOutcome {
        perform(self.transport.as_ref(), &self.config(), method, params)
    }

    /// Send a request.
    ///
    /// In `Sync` mode this blocks until the exchange finishes. A successful
    /// body is returned and the listener is left alone; on failure the
    /// listener's `on_error` is called once and `None` is returned.
    ///
    /// In `Async` mode this returns `None` immediately and the listener gets
    /// exactly one callback from a worker thread once the request finishes.
    pub fn send(
        &self,
        method: HttpMethod,
        params: ParamSet,
        mode: ExecutionMode,
        listener: Arc<dyn ResultListener>,
    ) -> Option<String> {
        let config = self.config();
        debug!(%method, ?mode, url = %config.server_url, "send");

        match mode {
            ExecutionMode::Sync => {
                match perform(self.transport.as_ref(), &config, method, &params).into_result() {
                    Ok(body) => Some(body),
                    Err(err) => {
                        listener.on_error(&err.to_string());
                        None
                    }
                }
            }
            ExecutionMode::Async => {
                self.executor.run(method, params, config, listener);
                None
            }
        }
    }
}

/// Encode `params` and build the descriptor for `config`'s endpoint.
fn prepare(
    config: &RequestConfig,
    method: HttpMethod,
    params: &ParamSet,
) -> Result<HttpRequest, RequestError> {
    if config.server_url.is_empty() {
        return Err(RequestError::Connection(
            "no server URL configured".to_string(),
        ));
    }
    let encoded = params::encode(params)?;
    Ok(build_request(method, &config.server_url, &encoded))
}

/// The synchronous request path shared by `Sync` sends and async workers.
pub(crate) fn perform(
    transport: &dyn Transport,
    config: &RequestConfig,
    method: HttpMethod,
    params: &ParamSet,
) -> ResponseOutcome {
    let outcome = match prepare(config, method, params) {
        Ok(request) => {
            debug!(%method, url = %request.url, "dispatch");
            transport::execute(transport, &request, config.timeouts())
        }
        Err(err) => ResponseOutcome::Failure(err),
    };

    if let ResponseOutcome::Failure(err) = &outcome {
        warn!(kind = ?err.kind(), status = ?err.status(), "request failed: {err}");
    }
    outcome
}

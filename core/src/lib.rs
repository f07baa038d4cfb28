//! Minimal form-encoded HTTP request client.
//!
//! # Overview
//! Sends GET or POST requests carrying string key/value parameters to one
//! configured endpoint, either blocking (`ExecutionMode::Sync`, the body is
//! returned) or in the background (`ExecutionMode::Async`, the outcome goes to
//! a `ResultListener`). Connection and socket timeouts are configurable and
//! every failure is classified into a small, fixed set of `ErrorKind`s.
//!
//! # Design
//! - `params` encodes parameters, `http` turns them into a descriptor, and
//!   `transport` is the only module that does I/O. Descriptors are plain data
//!   that can be inspected before dispatch.
//! - `RequestClient` snapshots its configuration per request, so it can be
//!   shared between threads and reconfigured at any time.
//! - `AsyncExecutor` runs the synchronous path on a worker thread and
//!   guarantees one callback per request.

pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod http;
pub mod listener;
pub mod params;
pub mod transport;
pub mod types;

pub use client::RequestClient;
pub use config::{RequestConfig, Timeouts};
pub use error::{ConfigError, ErrorKind, RequestError};
pub use executor::AsyncExecutor;
pub use http::{build_request, HttpMethod, HttpRequest, HttpResponse, FORM_CONTENT_TYPE};
pub use listener::ResultListener;
pub use params::ParamSet;
pub use transport::{Transport, UreqTransport};
pub use types::{ExecutionMode, ResponseOutcome};

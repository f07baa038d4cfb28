//! Network execution of request descriptors.
//!
//! # Design
//! `Transport` is the only place that performs I/O. A transport returns the
//! raw status and body, or a `RequestError` already classified into one of
//! the transport kinds (connect timeout, socket timeout, protocol, other
//! I/O). `execute` then applies the status rule shared by every transport:
//! 200 is a success, anything else is `Server`.
//!
//! `UreqTransport` builds a fresh blocking agent per request so the
//! timeouts snapshotted for that request are the ones applied.

use std::borrow::Cow;
use std::io;

use tracing::debug;
use ureq::{Agent, Timeout};

use crate::config::Timeouts;
use crate::error::RequestError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::ResponseOutcome;

/// Executes an `HttpRequest` against the network.
pub trait Transport: Send + Sync {
    /// Perform one blocking exchange. Non-200 statuses are returned as data.
    fn round_trip(
        &self,
        request: &HttpRequest,
        timeouts: Timeouts,
    ) -> Result<HttpResponse, RequestError>;
}

/// Run `request` on `transport` and classify the result.
pub fn execute(transport: &dyn Transport, request: &HttpRequest, timeouts: Timeouts) -> ResponseOutcome {
    match transport.round_trip(request, timeouts) {
        Ok(response) => {
            debug!(status = response.status, url = %request.url, "response received");
            check_status(response).into()
        }
        Err(err) => ResponseOutcome::Failure(err),
    }
}

fn check_status(response: HttpResponse) -> Result<String, RequestError> {
    if response.status == 200 {
        Ok(response.body)
    } else {
        Err(RequestError::Server {
            status: response.status,
        })
    }
}

/// Blocking HTTP/1.1 transport built on `ureq`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UreqTransport;

impl UreqTransport {
    fn agent(timeouts: Timeouts) -> Agent {
        Agent::config_builder()
            .http_status_as_error(false)
            .timeout_connect(timeouts.connect)
            .timeout_recv_response(timeouts.socket)
            .timeout_recv_body(timeouts.socket)
            .build()
            .new_agent()
    }
}

impl Transport for UreqTransport {
    fn round_trip(
        &self,
        request: &HttpRequest,
        timeouts: Timeouts,
    ) -> Result<HttpResponse, RequestError> {
        let agent = Self::agent(timeouts);

        let result = match request.method {
            HttpMethod::Get => {
                let mut builder = agent.get(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            HttpMethod::Post => {
                let mut builder = agent.post(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.send(request.body.as_deref().unwrap_or_default())
            }
        };

        let mut response = result.map_err(classify)?;
        let status = response.status().as_u16();
        let bytes = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(classify)?;

        Ok(HttpResponse {
            status,
            body: body_text(&bytes, &request.url),
        })
    }
}

/// Decode a response body, replacing invalid UTF-8 sequences with U+FFFD.
fn body_text(bytes: &[u8], url: &str) -> String {
    match String::from_utf8_lossy(bytes) {
        Cow::Borrowed(text) => text.to_string(),
        Cow::Owned(text) => {
            debug!(url, len = bytes.len(), "response body is not valid UTF-8, decoded lossily");
            text
        }
    }
}

/// Map a `ureq` failure onto the transport error kinds.
fn classify(err: ureq::Error) -> RequestError {
    let detail = err.to_string();
    match &err {
        ureq::Error::Timeout(Timeout::Connect | Timeout::Resolve) => {
            RequestError::ConnectTimeout(detail)
        }
        ureq::Error::Timeout(_) => RequestError::SocketTimeout(detail),
        ureq::Error::Io(e) if e.kind() == io::ErrorKind::TimedOut => {
            RequestError::SocketTimeout(detail)
        }
        ureq::Error::Protocol(_) => RequestError::Protocol(detail),
        _ => RequestError::Connection(detail),
    }
}

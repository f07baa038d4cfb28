//! Client configuration: target URL and the two per-request timeouts.
//!
//! A timeout of `0` disables that timeout. `RequestConfig` can be built in
//! code, read from JSON, or read from `FORMREQ_*` environment variables.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const ENV_SERVER_URL: &str = "FORMREQ_SERVER_URL";
pub const ENV_CONNECT_TIMEOUT_MS: &str = "FORMREQ_CONNECT_TIMEOUT_MS";
pub const ENV_SOCKET_TIMEOUT_MS: &str = "FORMREQ_SOCKET_TIMEOUT_MS";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    /// Absolute URL of the single endpoint this client talks to.
    pub server_url: String,
    /// Limit on establishing the connection, in milliseconds.
    pub connection_timeout_ms: u64,
    /// Limit on waiting for response data, in milliseconds.
    pub socket_timeout_ms: u64,
}

/// Timeouts in the form a transport applies them; `None` means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timeouts {
    pub connect: Option<Duration>,
    pub socket: Option<Duration>,
}

impl RequestConfig {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read configuration from the environment. Unset variables keep their
    /// defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(url) = lookup(ENV_SERVER_URL) {
            config.server_url = url;
        }
        if let Some(ms) = parse_millis(&lookup, ENV_CONNECT_TIMEOUT_MS)? {
            config.connection_timeout_ms = ms;
        }
        if let Some(ms) = parse_millis(&lookup, ENV_SOCKET_TIMEOUT_MS)? {
            config.socket_timeout_ms = ms;
        }
        Ok(config)
    }

    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            connect: millis(self.connection_timeout_ms),
            socket: millis(self.socket_timeout_ms),
        }
    }
}

fn millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

fn parse_millis(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &str,
) -> Result<Option<u64>, ConfigError> {
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    let parsed: Result<u64, _> = raw.trim().parse();
    match parsed {
        Ok(ms) => Ok(Some(ms)),
        Err(_) => Err(ConfigError::InvalidTimeout {
            var: var.to_string(),
            value: raw,
        }),
    }
}

//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Root configuration for the relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Access-key authentication settings.
    pub auth: AuthConfig,

    /// Downstream fluent forwarder settings.
    pub forward: ForwardConfig,

    /// Liveness/readiness probe settings.
    pub health_check: HealthCheckConfig,

    /// Graceful shutdown settings.
    pub shutdown: ShutdownConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Access-key authentication configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Static access key the `X-Amz-Firehose-Access-Key` header must match.
    /// Empty means every request is rejected.
    pub access_key: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_key: String::new(),
        }
    }
}

/// Downstream forwarder configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ForwardConfig {
    /// Aggregator address as "host:port".
    pub address: String,
}

impl Default for ForwardConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:24224".to_string(),
        }
    }
}

impl ForwardConfig {
    /// Split the configured address into a validated host/port pair.
    pub fn target(&self) -> Result<ForwardTarget, AddressError> {
        let (host, port) = self
            .address
            .rsplit_once(':')
            .ok_or_else(|| AddressError::MissingPort(self.address.clone()))?;
        if host.is_empty() {
            return Err(AddressError::EmptyHost(self.address.clone()));
        }
        let port = port
            .parse()
            .map_err(|source| AddressError::InvalidPort(self.address.clone(), source))?;
        Ok(ForwardTarget {
            host: host.to_string(),
            port,
        })
    }
}

/// A parsed forward address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardTarget {
    pub host: String,
    pub port: u16,
}

impl std::fmt::Display for ForwardTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Errors from parsing the forward address.
#[derive(Debug, Error)]
pub enum AddressError {
    /// No ":port" suffix present.
    #[error("forward address {0:?} is missing a port")]
    MissingPort(String),

    /// Nothing before the ":port" suffix.
    #[error("forward address {0:?} has an empty host")]
    EmptyHost(String),

    /// Port suffix is not a valid u16.
    #[error("forward address {0:?} has an invalid port: {1}")]
    InvalidPort(String, std::num::ParseIntError),
}

/// Probe configuration for the liveness/readiness endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// TCP dial timeout against the forward target, in milliseconds.
    pub probe_timeout_ms: u64,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            probe_timeout_ms: 50,
        }
    }
}

/// Graceful shutdown configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ShutdownConfig {
    /// Bound on waiting for in-flight requests after a termination signal.
    pub drain_timeout_secs: u64,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            drain_timeout_secs: 5,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Expose the Prometheus scrape endpoint at /metrics.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
        }
    }
}

//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the dose service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Inbound HTTP listener.
    pub listener: ListenerConfig,

    /// Downstream medicine API that receives dose reports.
    pub downstream: DownstreamConfig,

    /// Background job dispatcher limits.
    pub workers: WorkerConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (all interfaces by default).
    pub bind_host: String,

    /// TCP port.
    pub port: u16,

    /// Time allowed for a client to send the request headers.
    pub read_timeout_secs: u64,

    /// Time allowed to produce the response.
    pub write_timeout_secs: u64,

    /// Maximum size of the header buffer per connection.
    pub max_header_bytes: usize,

    /// Maximum accepted request body size.
    pub max_body_bytes: usize,

    /// How long the binary waits for in-flight requests on shutdown.
    pub shutdown_timeout_secs: u64,
}

impl ListenerConfig {
    /// Full `host:port` bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_host, self.port)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout_secs)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            port: 8080,
            read_timeout_secs: 10,
            write_timeout_secs: 10,
            max_header_bytes: 1 << 20,
            max_body_bytes: 1 << 20,
            shutdown_timeout_secs: 5,
        }
    }
}

/// Downstream medicine API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DownstreamConfig {
    /// Scheme, host and port of the medicine API (no trailing path).
    pub base_url: String,

    /// Timeout for a single dose report PUT.
    pub request_timeout_secs: u64,
}

impl DownstreamConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for DownstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "http://django:8000".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Job dispatcher configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Jobs allowed to run (sleep + report) at the same time.
    pub max_concurrent_jobs: usize,

    /// Jobs that may wait for a free worker before submissions are refused.
    pub queue_capacity: usize,

    /// Fixed seed for the dose generator. Entropy-seeded when absent.
    pub rng_seed: Option<u64>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_jobs: 256,
            queue_capacity: 1024,
            rng_seed: None,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus endpoint.
    pub metrics_enabled: bool,

    /// Prometheus endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_service_contract() {
        let config = ServiceConfig::default();
        assert_eq!(config.listener.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.listener.read_timeout(), Duration::from_secs(10));
        assert_eq!(config.listener.write_timeout(), Duration::from_secs(10));
        assert_eq!(config.listener.max_header_bytes, 1_048_576);
        assert_eq!(config.downstream.base_url, "http://django:8000");
        assert!(config.workers.rng_seed.is_none());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: ServiceConfig = toml::from_str(
            r#"
            [listener]
            port = 9000

            [workers]
            rng_seed = 7
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.port, 9000);
        assert_eq!(config.listener.bind_host, "0.0.0.0");
        assert_eq!(config.workers.rng_seed, Some(7));
        assert_eq!(config.workers.queue_capacity, 1024);
        assert_eq!(config.observability.log_level, "info");
    }
}

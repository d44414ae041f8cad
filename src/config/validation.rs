//! Configuration validation.
//!
//! Returns every problem found rather than stopping at the first one.

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::ServiceConfig;

/// Smallest header buffer hyper accepts.
pub const MIN_HEADER_BYTES: usize = 8192;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("listener.max_header_bytes must be at least {min}, got {actual}")]
    HeaderBufferTooSmall { min: usize, actual: usize },

    #[error("downstream.base_url '{url}' is invalid: {reason}")]
    InvalidDownstreamUrl { url: String, reason: String },

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Check a parsed configuration for values that deserialize fine but cannot run.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let positive = [
        ("listener.read_timeout_secs", config.listener.read_timeout_secs as usize),
        ("listener.write_timeout_secs", config.listener.write_timeout_secs as usize),
        ("listener.max_body_bytes", config.listener.max_body_bytes),
        ("downstream.request_timeout_secs", config.downstream.request_timeout_secs as usize),
        ("workers.max_concurrent_jobs", config.workers.max_concurrent_jobs),
        ("workers.queue_capacity", config.workers.queue_capacity),
    ];
    for (field, value) in positive {
        if value == 0 {
            errors.push(ValidationError::Zero { field });
        }
    }

    if config.listener.max_header_bytes < MIN_HEADER_BYTES {
        errors.push(ValidationError::HeaderBufferTooSmall {
            min: MIN_HEADER_BYTES,
            actual: config.listener.max_header_bytes,
        });
    }

    if let Err(reason) = check_downstream_url(&config.downstream.base_url) {
        errors.push(ValidationError::InvalidDownstreamUrl {
            url: config.downstream.base_url.clone(),
            reason,
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_downstream_url(raw: &str) -> Result<(), String> {
    let url = reqwest::Url::parse(raw).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme '{}'", other)),
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    Ok(())
}

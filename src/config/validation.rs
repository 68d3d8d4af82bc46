//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, limits > 0)
//! - Check that addresses parse before anything tries to bind them
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: must be greater than zero")]
    Zero { field: &'static str },

    #[error("upstream.max_parallel_fetches ({parallel}) exceeds upstream.max_urls ({max_urls})")]
    ParallelismAboveUrlCap { parallel: usize, max_urls: usize },
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    let non_zero = [
        ("listener.max_connections", config.listener.max_connections as u64),
        ("listener.read_timeout_ms", config.listener.read_timeout_ms),
        ("upstream.client_timeout_ms", config.upstream.client_timeout_ms),
        ("upstream.max_urls", config.upstream.max_urls as u64),
        ("upstream.max_parallel_fetches", config.upstream.max_parallel_fetches as u64),
        ("request.max_body_bytes", config.request.max_body_bytes as u64),
        ("shutdown.grace_period_ms", config.shutdown.grace_period_ms),
    ];
    for (field, value) in non_zero {
        if value == 0 {
            errors.push(ValidationError::Zero { field });
        }
    }

    if config.upstream.max_parallel_fetches > config.upstream.max_urls {
        errors.push(ValidationError::ParallelismAboveUrlCap {
            parallel: config.upstream.max_parallel_fetches,
            max_urls: config.upstream.max_urls,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(validate_config(&GatewayConfig::default()), Ok(()));
    }

    #[test]
    fn reports_every_error() {
        let mut config = GatewayConfig::default();
        config.listener.bind_address = ":8080".into();
        config.listener.max_connections = 0;
        config.upstream.client_timeout_ms = 0;
        config.upstream.max_parallel_fetches = 50;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: ":8080".into(),
        }));
        assert!(errors.contains(&ValidationError::Zero { field: "listener.max_connections" }));
        assert!(errors.contains(&ValidationError::Zero { field: "upstream.client_timeout_ms" }));
        assert!(errors.contains(&ValidationError::ParallelismAboveUrlCap {
            parallel: 50,
            max_urls: 20,
        }));
    }

    #[test]
    fn metrics_address_checked_only_when_enabled() {
        let mut config = GatewayConfig::default();
        config.observability.metrics_address = "nowhere".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}

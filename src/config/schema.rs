//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files, and
//! every default matches the limits the gateway has always shipped with.

use std::time::Duration;

use serde::Deserialize;

/// Root configuration for the fetch gateway.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, connection cap, read timeout).
    pub listener: ListenerConfig,

    /// Upstream fetch settings.
    pub upstream: UpstreamConfig,

    /// Inbound request handling.
    pub request: RequestConfig,

    /// Graceful shutdown settings.
    pub shutdown: ShutdownConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum concurrent connections (backpressure).
    pub max_connections: usize,

    /// Time allowed for reading request headers, and separately the body.
    pub read_timeout_ms: u64,
}

impl ListenerConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_connections: 100,
            read_timeout_ms: 10_000,
        }
    }
}

/// How upstream bodies are rendered into the `Data` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DataEncoding {
    /// UTF-8 text, invalid sequences replaced with U+FFFD.
    #[default]
    Text,
    /// Standard base64 of the raw bytes.
    Base64,
}

/// Upstream fetch configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Total timeout per upstream GET (connect, headers and body).
    pub client_timeout_ms: u64,

    /// Maximum number of URLs accepted in one request.
    pub max_urls: usize,

    /// Upstream fetches kept in flight per request. 1 means sequential.
    pub max_parallel_fetches: usize,

    /// Rendering of upstream bodies in the response.
    pub data_encoding: DataEncoding,
}

impl UpstreamConfig {
    pub fn client_timeout(&self) -> Duration {
        Duration::from_millis(self.client_timeout_ms)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            client_timeout_ms: 500,
            max_urls: 20,
            max_parallel_fetches: 1,
            data_encoding: DataEncoding::Text,
        }
    }
}

/// What the handler does with requests that are not POST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MethodPolicy {
    /// Answer 405 without reading the body.
    #[default]
    Reject,
    /// Log a warning and process the request as if it were a POST.
    Permissive,
}

/// Inbound request configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    /// Largest request body the handler will buffer.
    pub max_body_bytes: usize,

    /// Handling of non-POST methods.
    pub method_policy: MethodPolicy,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 1024 * 1024,
            method_policy: MethodPolicy::Reject,
        }
    }
}

/// Graceful shutdown configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShutdownConfig {
    /// Deadline for in-flight connections once shutdown starts.
    pub grace_period_ms: u64,
}

impl ShutdownConfig {
    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        // Ten upstream client timeouts.
        Self {
            grace_period_ms: 5_000,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipped_limits() {
        let config = GatewayConfig::default();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.listener.max_connections, 100);
        assert_eq!(config.listener.read_timeout(), Duration::from_secs(10));
        assert_eq!(config.upstream.client_timeout(), Duration::from_millis(500));
        assert_eq!(config.upstream.max_urls, 20);
        assert_eq!(config.upstream.max_parallel_fetches, 1);
        assert_eq!(
            config.shutdown.grace_period(),
            config.upstream.client_timeout() * 10
        );
        assert_eq!(config.request.method_policy, MethodPolicy::Reject);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [upstream]
            max_urls = 5
            data_encoding = "base64"

            [request]
            method_policy = "permissive"
            "#,
        )
        .unwrap();

        assert_eq!(config.upstream.max_urls, 5);
        assert_eq!(config.upstream.data_encoding, DataEncoding::Base64);
        assert_eq!(config.upstream.client_timeout_ms, 500);
        assert_eq!(config.request.method_policy, MethodPolicy::Permissive);
        assert_eq!(config.listener.max_connections, 100);
    }

    #[test]
    fn unknown_encoding_is_rejected() {
        let result: Result<GatewayConfig, _> = toml::from_str(
            r#"
            [upstream]
            data_encoding = "hex"
            "#,
        );
        assert!(result.is_err());
    }
}

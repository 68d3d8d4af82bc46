//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): inbound requests by method, status
//! - `gateway_request_duration_seconds` (histogram): inbound latency
//! - `gateway_upstream_fetches_total` (counter): upstream GETs by outcome
//! - `gateway_upstream_fetch_duration_seconds` (histogram): upstream latency
//! - `gateway_active_connections` (gauge): current connection count

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one handled inbound request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    ::metrics::counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("gateway_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record one upstream fetch. `outcome` is a fixed label such as "ok" or "timeout".
pub fn record_upstream_fetch(outcome: &'static str, start: Instant) {
    ::metrics::counter!("gateway_upstream_fetches_total", "outcome" => outcome).increment(1);
    ::metrics::histogram!("gateway_upstream_fetch_duration_seconds")
        .record(start.elapsed().as_secs_f64());
}

/// Publish the number of open inbound connections.
pub fn record_active_connections(count: u64) {
    ::metrics::gauge!("gateway_active_connections").set(count as f64);
}

//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by endpoint, outcome
//! - `proxy_request_duration_seconds` (histogram): handler latency by endpoint
//! - `proxy_upstream_calls_total` (counter): provider calls by operation, status
//! - `proxy_upstream_duration_seconds` (histogram): provider latency by operation
//!
//! Recording is a no-op until a recorder is installed, so handlers and tests
//! can call these functions unconditionally.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Start the Prometheus scrape endpoint on `addr`. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record a handled API request.
pub fn record_request(endpoint: &'static str, outcome: &'static str, start: Instant) {
    metrics::counter!("proxy_requests_total", "endpoint" => endpoint, "outcome" => outcome)
        .increment(1);
    metrics::histogram!("proxy_request_duration_seconds", "endpoint" => endpoint)
        .record(start.elapsed().as_secs_f64());
}

/// Record one call to the provider. `status` is the HTTP status or "error".
pub fn record_upstream_call(operation: &'static str, status: &str, start: Instant) {
    metrics::counter!(
        "proxy_upstream_calls_total",
        "operation" => operation,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("proxy_upstream_duration_seconds", "operation" => operation)
        .record(start.elapsed().as_secs_f64());
}

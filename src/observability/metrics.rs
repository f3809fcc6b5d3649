//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define relay metrics (requests, latency, failures, streamed bytes)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `relay_requests_total` (counter): proxied requests by kind, status
//! - `relay_request_duration_seconds` (histogram): time to response head
//! - `relay_upstream_failures_total` (counter): failures by category
//! - `relay_segment_bytes_total` (counter): bytes streamed to clients
//! - `relay_playlist_rewrites_total` (counter): rewritten playlists
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Labels are low-cardinality (kind, status, category only)

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with an HTTP listener on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a finished proxy request.
pub fn record_request(kind: &'static str, status: u16, start: Instant) {
    ::metrics::counter!(
        "relay_requests_total",
        "kind" => kind,
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("relay_request_duration_seconds", "kind" => kind)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_failure(category: &'static str) {
    ::metrics::counter!("relay_upstream_failures_total", "category" => category).increment(1);
}

pub fn record_segment_bytes(bytes: u64) {
    ::metrics::counter!("relay_segment_bytes_total").increment(bytes);
}

pub fn record_playlist_rewrite() {
    ::metrics::counter!("relay_playlist_rewrites_total").increment(1);
}

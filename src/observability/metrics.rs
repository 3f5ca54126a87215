//! Metrics collection and exposition.
//!
//! # Metrics
//! - `redirector_decisions_total` (counter): decisions by outcome, status
//! - `redirector_decision_duration_seconds` (histogram): resolution latency
//!
//! # Design Decisions
//! - Recording is a no-op until `init_metrics` installs the exporter
//! - Labels limited to outcome and status to keep cardinality fixed

use std::net::SocketAddr;
use std::time::Instant;

use axum::http::StatusCode;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one resolved request.
pub fn record_decision(outcome: &'static str, status: StatusCode, start: Instant) {
    metrics::counter!(
        "redirector_decisions_total",
        "outcome" => outcome,
        "status" => status.as_u16().to_string()
    )
    .increment(1);
    metrics::histogram!("redirector_decision_duration_seconds")
        .record(start.elapsed().as_secs_f64());
}

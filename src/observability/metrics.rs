//! Metrics collection and exposition.
//!
//! # Metrics
//! - `pipeline_operations_total` (counter): operations by intent and outcome
//! - `pipeline_upstream_errors_total` (counter): failures by upstream service
//! - `pipeline_broadcasts_total` (counter): transactions submitted
//!
//! # Design Decisions
//! - Low-overhead updates (atomic operations)
//! - Prometheus exposition is optional and off by default

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on the given address.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter started"),
        Err(e) => tracing::error!(error = %e, "Failed to start metrics exporter"),
    }
}

/// Count one finished operation with its outcome category.
pub fn record_operation(intent: &'static str, outcome: &'static str) {
    metrics::counter!(
        "pipeline_operations_total",
        "intent" => intent,
        "outcome" => outcome,
    )
    .increment(1);
}

/// Count an upstream failure by service name.
pub fn record_upstream_error(service: &'static str) {
    metrics::counter!("pipeline_upstream_errors_total", "service" => service).increment(1);
}

/// Count one broadcast transaction.
pub fn record_broadcast() {
    metrics::counter!("pipeline_broadcasts_total").increment(1);
}

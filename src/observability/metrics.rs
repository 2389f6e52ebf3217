//! Metrics collection and exposition.
//!
//! # Metrics
//! - `guard_decisions_total` (counter): decisions by outcome and protection
//! - `guard_errors_total` (counter): errored requests by error kind
//! - `guard_evaluation_duration_seconds` (histogram): fetch + rule evaluation time

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a final decision for one request.
pub fn record_decision(outcome: &'static str, protected: bool) {
    let protected = if protected { "true" } else { "false" };
    counter!("guard_decisions_total", "outcome" => outcome, "protected" => protected).increment(1);
}

/// Record the time spent fetching data and running rules.
pub fn record_evaluation(start: Instant) {
    histogram!("guard_evaluation_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record an errored request.
pub fn record_error(kind: &'static str) {
    counter!("guard_errors_total", "kind" => kind).increment(1);
}

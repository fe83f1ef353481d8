//! Metrics collection and exposition.
//!
//! # Metrics
//! - `launchpad_payments_total` (counter): attempts by outcome, network
//! - `launchpad_payment_duration_seconds` (histogram): trigger to terminal state
//! - `launchpad_triggers_ignored_total` (counter): triggers dropped while in flight
//! - `launchpad_receiver_lookups_total` (counter): receiver lookups by result
//! - `launchpad_http_requests_total` (counter): HTTP requests by method, path, status

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must run inside a tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_payment(outcome: &'static str, network: &'static str, start: Instant) {
    metrics::counter!(
        "launchpad_payments_total",
        "outcome" => outcome,
        "network" => network
    )
    .increment(1);
    metrics::histogram!("launchpad_payment_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_trigger_ignored() {
    metrics::counter!("launchpad_triggers_ignored_total").increment(1);
}

pub fn record_receiver_lookup(ok: bool) {
    metrics::counter!("launchpad_receiver_lookups_total", "ok" => if ok { "true" } else { "false" })
        .increment(1);
}

pub fn record_http_request(method: &str, path: &str, status: u16) {
    metrics::counter!(
        "launchpad_http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

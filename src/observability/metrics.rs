//! Metrics collection and exposition.
//!
//! # Metrics
//! - `redirect_requests_total` (counter): requests by method and status
//! - `redirect_resolutions_total` (counter): engine decisions by site and
//!   outcome (redirect/rewrite/pass)
//! - `redirect_request_duration_seconds` (histogram): end-to-end latency
//!
//! # Design Decisions
//! - Prometheus exposition on a dedicated address, separate from traffic
//! - Label cardinality kept to site, outcome, method and status

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and exposition endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(err) => tracing::error!(error = %err, "Failed to start metrics endpoint"),
    }
}

/// Record one completed request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "redirect_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("redirect_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record one engine decision.
pub fn record_resolution(site: &str, outcome: &'static str) {
    metrics::counter!(
        "redirect_resolutions_total",
        "site" => site.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

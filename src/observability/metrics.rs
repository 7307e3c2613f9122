//! Metrics collection and exposition.
//!
//! # Metrics
//! - `redirect_requests_total` (counter): requests by status and service
//! - `redirect_resolution_seconds` (histogram): time spent resolving a path
//! - `redirect_config_reloads_total` (counter): reloads by result
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint"),
    }
}

/// Record one answered request. `service` is "none" when no node answered.
pub fn record_request(status: u16, service: &str, start: Instant) {
    counter!(
        "redirect_requests_total",
        "status" => status.to_string(),
        "service" => service.to_string()
    )
    .increment(1);
    histogram!("redirect_resolution_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_reload(success: bool) {
    let result = if success { "ok" } else { "rejected" };
    counter!("redirect_config_reloads_total", "result" => result).increment(1);
}

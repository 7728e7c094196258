//! Metrics collection and exposition.
//!
//! # Metrics
//! - `twilio_webhook_validations_total` (counter): validation outcomes by
//!   `outcome` (`local_bypass`, `verified`, `rejected`)
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Prometheus endpoint is opt-in via `observability.metrics_enabled`

use std::net::SocketAddr;

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::security::Decision;

pub const VALIDATIONS_TOTAL: &str = "twilio_webhook_validations_total";

/// Start the Prometheus scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint"),
    }
}

/// Count one validation decision.
pub fn record_validation(decision: Decision) {
    counter!(VALIDATIONS_TOTAL, "outcome" => decision.as_str()).increment(1);
}

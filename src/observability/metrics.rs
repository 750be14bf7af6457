//! Metrics collection and exposition.
//!
//! # Metrics
//! - `nats_agent_updates_total` (counter): configuration updates by outcome
//! - `nats_agent_broker_launches_total` (counter): broker processes started
//! - `nats_agent_broker_exits_total` (counter): broker exits by outcome
//! - `nats_agent_broker_running` (gauge): 1 while a broker process is alive

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_update(outcome: &'static str) {
    counter!("nats_agent_updates_total", "outcome" => outcome).increment(1);
}

pub fn record_broker_launch() {
    counter!("nats_agent_broker_launches_total").increment(1);
    gauge!("nats_agent_broker_running").set(1.0);
}

pub fn record_broker_exit(clean: bool) {
    let outcome = if clean { "clean" } else { "error" };
    counter!("nats_agent_broker_exits_total", "outcome" => outcome).increment(1);
    gauge!("nats_agent_broker_running").set(0.0);
}

//! Metrics collection and exposition.
//!
//! # Metrics
//! - `tenant_router_requests_total` (counter): forwarded requests by method, status
//! - `tenant_router_request_duration_seconds` (histogram): forwarding latency
//! - `tenant_router_decisions_total` (counter): routing decisions by kind
//! - `tenant_router_sign_in_redirects_total` (counter): anonymous requests sent to sign in

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape listener on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    let labels = [("method", method.to_string()), ("status", status.to_string())];
    counter!("tenant_router_requests_total", &labels).increment(1);
    histogram!("tenant_router_request_duration_seconds", &labels).record(start.elapsed().as_secs_f64());
}

pub fn record_decision(kind: &'static str) {
    counter!("tenant_router_decisions_total", "kind" => kind).increment(1);
}

pub fn record_sign_in_redirect() {
    counter!("tenant_router_sign_in_redirects_total").increment(1);
}

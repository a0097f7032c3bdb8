//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, status
//! - `gateway_tenant_resolutions_total` (counter): resolutions by outcome
//! - `gateway_access_decisions_total` (counter): subscription gate decisions
//!   by action and reason
//! - `gateway_audit_write_failures_total` (counter): swallowed audit errors
//!
//! # Design Decisions
//! - Low-overhead metric updates (atomic operations)
//! - Exposition via the Prometheus exporter, bound to its own address

use std::net::SocketAddr;

/// Start the Prometheus exporter on the given address.
pub fn init_metrics(addr: SocketAddr) {
    match metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
    {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter started"),
        Err(e) => tracing::error!(error = %e, "Failed to start metrics exporter"),
    }
}

/// Record a completed request.
pub fn record_request(method: &str, status: u16) {
    metrics::counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
    )
    .increment(1);
}

/// Record a tenant resolution outcome (resolved, default, not_found,
/// inactive, bypassed, error).
pub fn record_resolution(outcome: &'static str) {
    metrics::counter!("gateway_tenant_resolutions_total", "outcome" => outcome).increment(1);
}

/// Record a subscription gate decision.
pub fn record_access_decision(action: &'static str, reason: &'static str) {
    metrics::counter!(
        "gateway_access_decisions_total",
        "action" => action,
        "reason" => reason,
    )
    .increment(1);
}

/// Record a swallowed audit-log write failure.
pub fn record_audit_failure() {
    metrics::counter!("gateway_audit_write_failures_total").increment(1);
}

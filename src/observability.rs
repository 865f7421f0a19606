//! Request, upstream and hours metrics.
//!
//! Recording is always safe: without an installed recorder the `metrics`
//! macros are no-ops, so tests and the CLI need no setup.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::net::SocketAddr;
use std::sync::Once;
use tracing::{info, warn};

use crate::common::types::Provider;

static INIT: Once = Once::new();

pub const REQUESTS_TOTAL: &str = "gateway_requests_total";
pub const UPSTREAM_ERRORS_TOTAL: &str = "gateway_upstream_errors_total";
pub const HOURS_NORMALIZED_TOTAL: &str = "gateway_hours_normalized_total";
pub const HOURS_SEGMENTS: &str = "gateway_hours_segments";

/// Install the Prometheus exporter when an address is configured.
///
/// Idempotent. Must run inside the tokio runtime since the exporter's HTTP
/// listener is spawned onto it.
pub fn init_metrics(addr: Option<SocketAddr>) {
    INIT.call_once(|| {
        let Some(addr) = addr else {
            info!("METRICS_ADDR not set, metrics exporter disabled");
            return;
        };

        match metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()
        {
            Ok(()) => {
                info!("Prometheus HTTP exporter started at http://{}/metrics", addr);
                describe();
            }
            Err(e) => warn!("Failed to install Prometheus exporter: {}", e),
        }
    });
}

fn describe() {
    describe_counter!(REQUESTS_TOTAL, "Responses sent, by action and outcome status");
    describe_counter!(UPSTREAM_ERRORS_TOTAL, "Failed upstream calls, by provider and status");
    describe_counter!(HOURS_NORMALIZED_TOTAL, "Hours payloads normalized, by input shape");
    describe_histogram!(HOURS_SEGMENTS, "Day segments produced per normalized schedule");
}

pub fn request_succeeded(action: &str) {
    counter!(REQUESTS_TOTAL, "action" => action.to_string(), "status" => "OK").increment(1);
}

pub fn request_failed(action: &str, status: &str) {
    counter!(REQUESTS_TOTAL, "action" => action.to_string(), "status" => status.to_string()).increment(1);
}

pub fn upstream_error(provider: Provider, status: &str) {
    counter!(UPSTREAM_ERRORS_TOTAL, "provider" => provider.as_str(), "status" => status.to_string())
        .increment(1);
}

pub fn hours_normalized(shape: &'static str, segments: usize) {
    counter!(HOURS_NORMALIZED_TOTAL, "shape" => shape).increment(1);
    histogram!(HOURS_SEGMENTS).record(segments as f64);
}

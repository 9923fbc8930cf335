//! Prometheus export plus the domain counters of the quotation flow.

use crate::models::PriceType;
use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder. Must run once at startup, before any
/// metric is recorded.
pub fn init_metrics() {
    let builder = PrometheusBuilder::new();
    let handle = builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    if METRICS_HANDLE.set(handle).is_err() {
        panic!("failed to set metrics handle: already initialized");
    }
}

/// Current metrics in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

pub fn record_quote_computed(price_type: PriceType, source: &'static str) {
    counter!(
        "cost_quotes_computed_total",
        "price_type" => price_type.as_str(),
        "source" => source
    )
    .increment(1);
}

/// `reason` is one of `negative_input`, `invalid_input`, `result_mismatch`.
pub fn record_quote_rejected(reason: &'static str, source: &'static str) {
    counter!("cost_quotes_rejected_total", "reason" => reason, "source" => source).increment(1);
}

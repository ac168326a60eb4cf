use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, Encoder, HistogramVec,
    IntCounter, IntCounterVec, TextEncoder,
};

// Prometheus metrics (default registry)
pub static BACKEND_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "contractor_site_backend_requests_total",
        "Backend table requests by table, operation and outcome",
        &["table", "op", "outcome"]
    )
    .expect("register backend_requests_total")
});

pub static BACKEND_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "contractor_site_backend_request_duration_seconds",
        "Backend request duration in seconds",
        &["op"],
        vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]
    )
    .expect("register backend_request_duration")
});

pub static LEADS_SUBMITTED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "contractor_site_leads_submitted_total",
        "Leads inserted through the quote wizard"
    )
    .expect("register leads_submitted_total")
});

pub static WIZARD_REJECTIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "contractor_site_wizard_rejections_total",
        "Quote wizard advances rejected by validation, per step",
        &["step"]
    )
    .expect("register wizard_rejections_total")
});

pub fn record_backend(table: &str, op: &str, ok: bool) {
    let outcome = if ok { "ok" } else { "error" };
    BACKEND_REQUESTS_TOTAL.with_label_values(&[table, op, outcome]).inc();
}

/// Render the default registry in the Prometheus text format.
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

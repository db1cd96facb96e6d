// * Telemetry - JSON Logging and Prometheus Run Counters
// * Counters are process-wide; they are rendered on demand and never served over HTTP.

use lazy_static::lazy_static;
use prometheus::{register_counter_vec, CounterVec, Encoder, TextEncoder};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

lazy_static! {
    // * Products appended to a run, by source
    pub static ref PRODUCTS_SCRAPED_TOTAL: CounterVec = register_counter_vec!(
        "scout_products_scraped_total",
        "Total products scraped by source",
        &["source"]
    ).unwrap();

    // * Product URLs abandoned after retry exhaustion, by source
    pub static ref URL_FAILURES_TOTAL: CounterVec = register_counter_vec!(
        "scout_url_failures_total",
        "Total product URLs that exhausted their retries",
        &["source"]
    ).unwrap();

    // * Source outcomes (completed, failed, skipped, resumed)
    pub static ref SOURCES_TOTAL: CounterVec = register_counter_vec!(
        "scout_sources_total",
        "Total sources processed by outcome",
        &["status"]
    ).unwrap();

    // * Extraction retries (attempts beyond the first)
    pub static ref RETRY_ATTEMPTS_TOTAL: CounterVec = register_counter_vec!(
        "scout_retry_attempts_total",
        "Total extraction retry attempts by source",
        &["source"]
    ).unwrap();
}

/// Initializes the tracing subscriber with JSON formatting
///
/// # Example
/// ```ignore
/// use stroller_scout::ops::telemetry;
///
/// telemetry::init_tracing();
/// tracing::info!(source = "Mumzworld", "Scraping");
/// ```
pub fn init_tracing() {
    init_tracing_with_level("info");
}

/// Initializes tracing with custom log level (RUST_LOG still wins when set)
pub fn init_tracing_with_level(level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().json().with_target(false))
        .try_init();
}

/// Initializes tracing with pretty formatting (for interactive runs)
pub fn init_tracing_pretty(level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().pretty().with_target(false))
        .try_init();
}

/// Returns the current metrics as a string
pub fn get_metrics_string() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Records one appended product
pub fn record_product_scraped(source: &str) {
    PRODUCTS_SCRAPED_TOTAL.with_label_values(&[source]).inc();
}

/// Records a product URL given up on after all attempts
pub fn record_url_failure(source: &str) {
    URL_FAILURES_TOTAL.with_label_values(&[source]).inc();
}

/// Records a retry beyond the first attempt
pub fn record_retry_attempt(source: &str) {
    RETRY_ATTEMPTS_TOTAL.with_label_values(&[source]).inc();
}

/// Records a source outcome
pub fn record_source_outcome(status: &str) {
    SOURCES_TOTAL.with_label_values(&[status]).inc();
}

// * Operations: structured logging and run counters

pub mod telemetry;

// * Re-exports for convenient access
pub use telemetry::{
    get_metrics_string, init_tracing, init_tracing_pretty, init_tracing_with_level,
    record_product_scraped, record_retry_attempt, record_source_outcome, record_url_failure,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_exports() {
        record_source_outcome("resumed");
        let metrics = get_metrics_string();
        assert!(metrics.contains("scout_"));
    }
}

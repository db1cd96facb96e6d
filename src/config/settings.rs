// * Runtime knobs for a scrape run, defaulted from `constants`

use std::time::Duration;

use super::constants::{
    MAX_RETRIES, POLITENESS_MAX_MS, POLITENESS_MIN_MS, PROGRESS_EVERY, RETRY_BASE_DELAY_MS,
};

/// Configuration for the scrape orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeSettings {
    /// Extraction attempts per product URL
    pub max_retries: u32,
    /// Backoff unit; attempt N sleeps `retry_base_delay * N` before the next try
    pub retry_base_delay: Duration,
    /// Lower bound of the politeness jitter after a successful fetch
    pub politeness_min: Duration,
    /// Upper bound of the politeness jitter after a successful fetch
    pub politeness_max: Duration,
    /// Intra-source progress cadence in URLs
    pub progress_every: usize,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            max_retries: MAX_RETRIES,
            retry_base_delay: Duration::from_millis(RETRY_BASE_DELAY_MS),
            politeness_min: Duration::from_millis(POLITENESS_MIN_MS),
            politeness_max: Duration::from_millis(POLITENESS_MAX_MS),
            progress_every: PROGRESS_EVERY,
        }
    }
}

impl ScrapeSettings {
    /// Settings with every delay zeroed; retry count and cadence unchanged
    pub fn without_delays() -> Self {
        Self::default()
            .with_retry_base_delay(Duration::ZERO)
            .with_politeness(Duration::ZERO, Duration::ZERO)
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        // * At least one attempt, otherwise nothing would ever be fetched
        self.max_retries = max_retries.max(1);
        self
    }

    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    pub fn with_politeness(mut self, min: Duration, max: Duration) -> Self {
        self.politeness_min = min.min(max);
        self.politeness_max = max.max(min);
        self
    }

    pub fn with_progress_every(mut self, every: usize) -> Self {
        self.progress_every = every.max(1);
        self
    }
}

// * Scrape Orchestrator
// * Drives sources sequentially, URLs sequentially within a source, with checkpointed
// * resume, bounded retry, politeness jitter, and cooperative stop/skip control.

use crate::config::constants::PARTIAL_EXPORT_FILE;
use crate::config::settings::ScrapeSettings;
use crate::engine::control::ControlReceiver;
use crate::engine::politeness::jittered_pause;
use crate::engine::retry::retry_with_backoff;
use crate::network::adapter::{AdapterError, SourceAdapter};
use crate::network::registry::SourceRegistry;
use crate::ops::telemetry;
use crate::persistence::checkpoint::CheckpointStore;
use crate::persistence::errors::StorageError;
use crate::persistence::exporter::export_csv;
use crate::persistence::schema::{ProductRecord, RawRecord};
use crate::refinery::normalizer::normalize;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Fatal run errors. Adapter failures never surface here.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Storage failure: {0}")]
    Storage(#[from] StorageError),
}

/// Receives human-readable progress lines with an optional percent
pub trait ProgressSink: Send + Sync {
    fn emit(&self, message: &str, percent: Option<u8>);
}

impl<F> ProgressSink for F
where
    F: Fn(&str, Option<u8>) + Send + Sync,
{
    fn emit(&self, message: &str, percent: Option<u8>) {
        self(message, percent)
    }
}

/// Sink that only logs
pub struct LogOnlySink;

impl ProgressSink for LogOnlySink {
    fn emit(&self, _message: &str, _percent: Option<u8>) {}
}

#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Source names, processed in this order
    pub sources: Vec<String>,
    pub keyword: String,
    pub resume: bool,
    /// Run workspace holding the checkpoint and partial export
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub records: Vec<ProductRecord>,
    pub stopped_early: bool,
    /// Sources that finished (naturally, skipped by the user, or already done on resume)
    pub completed: usize,
    /// (source, reason) for sources whose listing failed
    pub failed: Vec<(String, String)>,
    pub total: usize,
}

pub struct Orchestrator {
    registry: Arc<SourceRegistry>,
    settings: ScrapeSettings,
}

// * Sends a line to the sink and mirrors it into the log.
fn emit(sink: &dyn ProgressSink, message: &str, percent: Option<u8>) {
    info!(percent = percent, "{}", message);
    sink.emit(message, percent);
}

fn emit_warn(sink: &dyn ProgressSink, message: &str, percent: Option<u8>) {
    warn!(percent = percent, "{}", message);
    sink.emit(message, percent);
}

fn source_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((completed * 100) / total).min(100) as u8
}

// * Progress within source `completed + 1`, after `done` of its `n` URLs.
fn url_percent(completed: usize, total: usize, done: usize, n: usize) -> u8 {
    if total == 0 || n == 0 {
        return source_percent(completed, total);
    }
    (((completed * n + done) * 100) / (n * total)).min(100) as u8
}

// * Every `every` URLs and always on the last one; a zero cadence means last-only.
fn progress_due(done: usize, n: usize, every: usize) -> bool {
    done == n || done.checked_rem(every) == Some(0)
}

impl Orchestrator {
    pub fn new(registry: Arc<SourceRegistry>, settings: ScrapeSettings) -> Self {
        Self { registry, settings }
    }

    /// Executes one run. Returns Ok for stopped and empty runs; Err only on storage failure.
    pub async fn run(
        &self,
        request: &RunRequest,
        sink: &dyn ProgressSink,
        control: &mut ControlReceiver,
    ) -> Result<RunReport, ScrapeError> {
        let result = self.run_inner(request, sink, control).await;
        // * Handles observe RunFinished from here on, whatever the outcome
        control.close();
        result
    }

    async fn run_inner(
        &self,
        request: &RunRequest,
        sink: &dyn ProgressSink,
        control: &mut ControlReceiver,
    ) -> Result<RunReport, ScrapeError> {
        std::fs::create_dir_all(&request.output_dir)
            .map_err(|e| StorageError::io(&request.output_dir, e))?;

        let mut store = CheckpointStore::open(&request.output_dir)?;
        if !request.resume {
            store.reset()?;
        }

        let partial_path = request.output_dir.join(PARTIAL_EXPORT_FILE);
        let total = request.sources.len();
        let mut report = RunReport {
            total,
            ..RunReport::default()
        };

        'sources: for (idx, source) in request.sources.iter().enumerate() {
            if control.should_stop() {
                report.stopped_early = true;
                break;
            }

            let Some(adapter) = self.registry.get(source) else {
                emit_warn(sink, &format!("[WARN] Unknown source: {}", source), None);
                telemetry::record_source_outcome("unknown");
                continue;
            };

            if request.resume && store.is_source_done(source) {
                report.completed += 1;
                telemetry::record_source_outcome("resumed");
                emit(
                    sink,
                    &format!("[SKIP] {} already completed", source),
                    Some(source_percent(report.completed, total)),
                );
                continue;
            }

            emit(
                sink,
                &format!("Scraping: {} ({}/{})", source, idx + 1, total),
                Some(source_percent(report.completed, total)),
            );

            // ! Panics raised while building the future must be caught too
            let listing = AssertUnwindSafe(async { adapter.list_product_urls(&request.keyword).await })
                .catch_unwind()
                .await
                .unwrap_or_else(|payload| Err(AdapterError::from_panic(payload)));

            let urls = match listing {
                Ok(urls) => urls,
                Err(e) => {
                    let reason = e.to_string();
                    store.mark_source_failed(source, &reason)?;
                    telemetry::record_source_outcome("failed");
                    emit_warn(
                        sink,
                        &format!("[FAIL] {}: {}", source, reason),
                        Some(source_percent(report.completed, total)),
                    );
                    report.failed.push((source.clone(), reason));
                    // * A skip aimed at this source dies with it
                    let _ = control.take_skip();
                    export_csv(&report.records, &partial_path)?;
                    continue;
                }
            };

            let n = urls.len();
            emit(sink, &format!("  Found {} product URLs", n), None);

            let mut skipped = false;
            for (i, url) in urls.iter().enumerate() {
                if control.should_stop() {
                    report.stopped_early = true;
                    emit_warn(sink, &format!("Stop requested during {}", source), None);
                    break 'sources;
                }

                if control.take_skip() {
                    skipped = true;
                    emit(sink, &format!("[SKIP] {} skipped by user", source), None);
                    break;
                }

                if !store.is_visited(source, url) {
                    match self.extract_with_retry(adapter.as_ref(), source, url, sink).await {
                        Ok(raw) => {
                            let record = normalize(raw).stamped(source, url);
                            report.records.push(record);
                            store.mark_visited(source, url)?;
                            telemetry::record_product_scraped(source);
                            jittered_pause(self.settings.politeness_min, self.settings.politeness_max)
                                .await;
                        }
                        Err(e) => {
                            telemetry::record_url_failure(source);
                            emit_warn(
                                sink,
                                &format!("  [WARN] Giving up on {}: {}", url, e),
                                None,
                            );
                        }
                    }
                }

                let done = i + 1;
                if progress_due(done, n, self.settings.progress_every) {
                    emit(
                        sink,
                        &format!(
                            "  {}: {}/{} URLs, {} products total",
                            source,
                            done,
                            n,
                            report.records.len()
                        ),
                        Some(url_percent(report.completed, total, done, n)),
                    );
                }
            }

            // ! A skip that lands after the last URL belongs to this source, not the next one
            if !skipped && control.take_skip() {
                debug!(source = %source, "Skip arrived after the last URL; source already finished");
            }

            store.mark_source_done(source)?;
            report.completed += 1;
            telemetry::record_source_outcome(if skipped { "skipped" } else { "completed" });
            export_csv(&report.records, &partial_path)?;
        }

        let mut summary = format!(
            "DONE — {} products from {}/{} sources",
            report.records.len(),
            report.completed,
            total
        );
        if !report.failed.is_empty() {
            summary.push_str(&format!(" ({} failed)", report.failed.len()));
        }
        if report.stopped_early {
            summary.push_str(" (stopped early)");
        }
        emit(sink, &summary, Some(100));

        Ok(report)
    }

    async fn extract_with_retry(
        &self,
        adapter: &dyn SourceAdapter,
        source: &str,
        url: &str,
        sink: &dyn ProgressSink,
    ) -> Result<RawRecord, AdapterError> {
        let max_attempts = self.settings.max_retries;
        retry_with_backoff(
            max_attempts,
            self.settings.retry_base_delay,
            |_| {
                AssertUnwindSafe(async move { adapter.extract_product(url).await })
                    .catch_unwind()
                    .map(|caught| caught.unwrap_or_else(|payload| Err(AdapterError::from_panic(payload))))
            },
            |attempt, err| {
                telemetry::record_retry_attempt(source);
                emit_warn(
                    sink,
                    &format!("  Retry {}/{} for {}: {}", attempt, max_attempts, url, err),
                    None,
                );
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_percent_floors() {
        assert_eq!(source_percent(0, 3), 0);
        assert_eq!(source_percent(1, 3), 33);
        assert_eq!(source_percent(2, 3), 66);
        assert_eq!(source_percent(3, 3), 100);
        assert_eq!(source_percent(0, 0), 100);
    }

    #[test]
    fn test_url_percent_interpolates_within_source() {
        // * Second of four sources, halfway through its 10 URLs
        assert_eq!(url_percent(1, 4, 5, 10), 37);
        assert_eq!(url_percent(0, 1, 10, 10), 100);
        assert_eq!(url_percent(2, 4, 0, 0), 50);
    }

    #[test]
    fn test_progress_due_cadence() {
        assert!(progress_due(5, 12, 5));
        assert!(!progress_due(6, 12, 5));
        assert!(progress_due(12, 12, 5));
        // * Zero cadence must not divide by zero
        assert!(!progress_due(3, 12, 0));
        assert!(progress_due(12, 12, 0));
    }

    #[test]
    fn test_closure_sink() {
        let lines = std::sync::Mutex::new(Vec::new());
        let sink = |msg: &str, pct: Option<u8>| lines.lock().unwrap().push((msg.to_string(), pct));
        sink.emit("Scraping: Mumzworld (1/1)", Some(0));
        assert_eq!(lines.lock().unwrap().len(), 1);
    }
}

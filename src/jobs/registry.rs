// * Control Surface: background scrape jobs addressed by id.
// * One tokio task per job; readers see job state through a shared mutex and
// * wake on a per-job version counter.

use crate::config::constants::JOB_RETENTION_SECS;
use crate::config::settings::ScrapeSettings;
use crate::engine::control::{control_channel, ControlError, ControlHandle, ControlReceiver};
use crate::engine::orchestrator::{Orchestrator, ProgressSink, RunReport, RunRequest};
use crate::jobs::errors::JobError;
use crate::jobs::events::{job_events, JobEvent};
use crate::jobs::meta::{job_id_from_meta, load_meta, save_meta};
use crate::network::registry::SourceRegistry;
use crate::persistence::errors::StorageError;
use crate::persistence::exporter::export_csv;
use chrono::{DateTime, Utc};
use futures::{FutureExt, Stream};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Running,
    Completed,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSummary {
    pub total: usize,
}

/// One scrape job as callers see it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunJob {
    pub id: String,
    pub keyword: String,
    pub sources: Vec<String>,
    pub status: JobStatus,
    pub progress: u8,
    pub messages: Vec<String>,
    pub summary: Option<JobSummary>,
    pub csv_path: Option<PathBuf>,
    pub csv_filename: Option<String>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub stopped_early: bool,
}

impl RunJob {
    pub fn is_terminal(&self) -> bool {
        self.status != JobStatus::Running
    }
}

/// Incremental view returned by `poll`
#[derive(Debug, Clone, Serialize)]
pub struct JobSnapshot {
    pub id: String,
    pub status: JobStatus,
    pub percent: u8,
    /// Messages appended since the caller's cursor
    pub messages: Vec<String>,
    /// Cursor to pass to the next poll
    pub next_cursor: usize,
    pub summary: Option<JobSummary>,
    pub stopped_early: bool,
    pub error: Option<String>,
}

struct JobEntry {
    job: RunJob,
    control: Option<ControlHandle>,
    version: watch::Sender<u64>,
}

struct RegistryInner {
    root: PathBuf,
    sources: Arc<SourceRegistry>,
    settings: ScrapeSettings,
    retention: Duration,
    jobs: Mutex<HashMap<String, JobEntry>>,
}

/// Shared handle to the job table; clones refer to the same jobs
#[derive(Clone)]
pub struct JobRegistry {
    inner: Arc<RegistryInner>,
}

// * File name offered for download: spaces become underscores.
pub fn export_file_name(keyword: &str) -> String {
    format!("{}_products.csv", keyword.trim().replace(' ', "_"))
}

// * Ids are generated here; anything else could walk out of the root via a path.
fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric())
}

fn remove_quietly(path: &Path) {
    let result = if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    match result {
        Ok(()) => debug!(path = %path.display(), "Removed expired job artifact"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove job artifact"),
    }
}

impl JobRegistry {
    /// Creates the registry and its root directory
    pub fn new(
        root: impl Into<PathBuf>,
        sources: Arc<SourceRegistry>,
        settings: ScrapeSettings,
    ) -> Result<Self, JobError> {
        Self::with_retention(root, sources, settings, Duration::from_secs(JOB_RETENTION_SECS))
    }

    /// Same as `new` with a custom retention window for finished jobs
    pub fn with_retention(
        root: impl Into<PathBuf>,
        sources: Arc<SourceRegistry>,
        settings: ScrapeSettings,
        retention: Duration,
    ) -> Result<Self, JobError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| StorageError::io(&root, e))?;

        Ok(Self {
            inner: Arc::new(RegistryInner {
                root,
                sources,
                settings,
                retention,
                jobs: Mutex::new(HashMap::new()),
            }),
        })
    }

    pub fn root(&self) -> &Path {
        &self.inner.root
    }

    /// Sorted names of every source a job may request
    pub fn available_sources(&self) -> Vec<String> {
        let mut names = self.inner.sources.names();
        names.sort();
        names
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, JobEntry>> {
        self.inner.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts a background job and returns its id
    pub fn submit(&self, keyword: &str, sources: Vec<String>) -> Result<String, JobError> {
        self.collect_garbage();

        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(JobError::InvalidRequest("Keyword is required".to_string()));
        }
        if sources.is_empty() {
            return Err(JobError::InvalidRequest("Select at least one retailer".to_string()));
        }

        let id = Uuid::new_v4().simple().to_string()[..8].to_string();
        let (control, control_rx) = control_channel();
        let (version, _) = watch::channel(0u64);

        let job = RunJob {
            id: id.clone(),
            keyword: keyword.to_string(),
            sources: sources.clone(),
            status: JobStatus::Running,
            progress: 0,
            messages: Vec::new(),
            summary: None,
            csv_path: None,
            csv_filename: None,
            error: None,
            created_at: Utc::now(),
            stopped_early: false,
        };

        self.lock().insert(
            id.clone(),
            JobEntry {
                job,
                control: Some(control),
                version,
            },
        );

        info!(job = %id, keyword = keyword, sources = sources.len(), "Job submitted");

        let registry = self.clone();
        let job_id = id.clone();
        let keyword = keyword.to_string();
        tokio::spawn(async move {
            registry.run_job(job_id, keyword, sources, control_rx).await;
        });

        Ok(id)
    }

    async fn run_job(
        &self,
        id: String,
        keyword: String,
        sources: Vec<String>,
        mut control_rx: ControlReceiver,
    ) {
        let orchestrator = Orchestrator::new(Arc::clone(&self.inner.sources), self.inner.settings.clone());
        let request = RunRequest {
            sources,
            keyword: keyword.clone(),
            resume: false,
            output_dir: self.inner.root.join(&id),
        };
        let sink = JobSink {
            registry: self.clone(),
            id: id.clone(),
        };

        let outcome = AssertUnwindSafe(orchestrator.run(&request, &sink, &mut control_rx))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(report)) => self.finish_success(&id, &keyword, report),
            Ok(Err(e)) => self.finish_error(&id, e.to_string()),
            Err(_) => self.finish_error(&id, "scrape task panicked".to_string()),
        }
    }

    fn finish_success(&self, id: &str, keyword: &str, report: RunReport) {
        let total = report.records.len();
        let mut file = None;

        if total > 0 {
            let name = export_file_name(keyword);
            let path = self.inner.root.join(format!("{}_{}", id, name));
            if let Err(e) = export_csv(&report.records, &path) {
                error!(job = %id, error = %e, "Final export failed");
                self.finish_error(id, e.to_string());
                return;
            }
            file = Some((path, name));
        }

        let message = match (report.stopped_early, total) {
            (true, 0) => "Stopped by user. No products were collected.".to_string(),
            (true, n) => format!("Stopped by user. Exported {} products collected so far.", n),
            (false, 0) => "No products found.".to_string(),
            (false, n) => format!("Done! Exported {} products to CSV.", n),
        };

        self.finish(id, |job| {
            job.status = JobStatus::Completed;
            job.summary = Some(JobSummary { total });
            job.stopped_early = report.stopped_early;
            if let Some((path, name)) = file {
                job.csv_path = Some(path);
                job.csv_filename = Some(name);
            }
            job.messages.push(message);
        });
    }

    fn finish_error(&self, id: &str, reason: String) {
        self.finish(id, |job| {
            job.status = JobStatus::Error;
            job.messages.push(format!("Error: {}", reason));
            job.error = Some(reason);
        });
    }

    // * Applies the terminal transition and drops the control handle.
    // ! The snapshot is written under the lock so nobody observes a terminal job without it
    fn finish(&self, id: &str, apply: impl FnOnce(&mut RunJob)) {
        let mut jobs = self.lock();
        let Some(entry) = jobs.get_mut(id) else {
            return;
        };
        apply(&mut entry.job);
        entry.job.progress = 100;
        entry.control = None;

        if let Err(e) = save_meta(&self.inner.root, &entry.job) {
            warn!(job = %id, error = %e, "Failed to write job snapshot");
        }
        entry.version.send_modify(|v| *v += 1);

        info!(job = %id, status = ?entry.job.status, stopped_early = entry.job.stopped_early, "Job finished");
    }

    fn record_progress(&self, id: &str, message: &str, percent: Option<u8>) {
        let mut jobs = self.lock();
        if let Some(entry) = jobs.get_mut(id) {
            entry.job.messages.push(message.to_string());
            if let Some(p) = percent {
                entry.job.progress = p.min(100);
            }
            entry.version.send_modify(|v| *v += 1);
        }
    }

    /// Current job state from memory, or from its snapshot after a restart
    pub fn get(&self, id: &str) -> Option<RunJob> {
        if !is_valid_id(id) {
            return None;
        }
        if let Some(entry) = self.lock().get(id) {
            return Some(entry.job.clone());
        }
        load_meta(&self.inner.root, id)
    }

    /// Messages since `cursor` plus the current status
    pub fn poll(&self, id: &str, cursor: usize) -> Result<JobSnapshot, JobError> {
        let job = self.get(id).ok_or_else(|| JobError::NotFound(id.to_string()))?;
        let start = cursor.min(job.messages.len());

        Ok(JobSnapshot {
            id: job.id,
            status: job.status,
            percent: job.progress,
            messages: job.messages[start..].to_vec(),
            next_cursor: job.messages.len(),
            summary: job.summary,
            stopped_early: job.stopped_early,
            error: job.error,
        })
    }

    /// Pushes job events until the terminal one
    pub fn events(&self, id: &str) -> Result<impl Stream<Item = JobEvent> + Send + 'static, JobError> {
        let rx = {
            let jobs = self.lock();
            jobs.get(id).map(|entry| entry.version.subscribe())
        };

        let rx = match rx {
            Some(rx) => rx,
            None => {
                if self.get(id).is_none() {
                    return Err(JobError::NotFound(id.to_string()));
                }
                // * Snapshot-only job: already terminal, nothing will ever change
                watch::channel(0u64).1
            }
        };

        Ok(job_events(self.clone(), id.to_string(), rx))
    }

    /// Asks the job to abandon its current source
    pub fn skip(&self, id: &str) -> Result<(), JobError> {
        self.control(id, |handle| handle.skip_source())
    }

    /// Asks the job to stop and keep what it has
    pub fn stop(&self, id: &str) -> Result<(), JobError> {
        self.control(id, |handle| handle.stop())
    }

    fn control(
        &self,
        id: &str,
        send: impl FnOnce(&ControlHandle) -> Result<(), ControlError>,
    ) -> Result<(), JobError> {
        let (known, handle) = {
            let jobs = self.lock();
            match jobs.get(id) {
                Some(entry) if entry.job.status == JobStatus::Running => (true, entry.control.clone()),
                Some(_) => (true, None),
                None => (false, None),
            }
        };

        if !known && self.get(id).is_none() {
            return Err(JobError::NotFound(id.to_string()));
        }

        let handle = handle.ok_or_else(|| JobError::NotRunning(id.to_string()))?;
        send(&handle).map_err(|_| JobError::NotRunning(id.to_string()))
    }

    /// Path and download name of the finished export
    pub fn download(&self, id: &str) -> Result<(PathBuf, String), JobError> {
        let job = self.get(id).ok_or_else(|| JobError::NotFound(id.to_string()))?;

        if job.status == JobStatus::Running {
            return Err(JobError::NotReady(id.to_string()));
        }

        match (job.csv_path, job.csv_filename) {
            (Some(path), Some(name)) if path.is_file() => Ok((path, name)),
            _ => Err(JobError::FileMissing(id.to_string())),
        }
    }

    /// Drops jobs and artifacts older than the retention window. Best effort.
    pub fn collect_garbage(&self) {
        let retention = chrono::Duration::from_std(self.inner.retention)
            .unwrap_or_else(|_| chrono::Duration::hours(2));
        let cutoff = Utc::now() - retention;

        {
            let mut jobs = self.lock();
            // ! Running jobs are never evicted; their task still writes into the entry
            jobs.retain(|_, entry| {
                entry.job.status == JobStatus::Running || entry.job.created_at >= cutoff
            });
        }

        let cutoff_time = SystemTime::now()
            .checked_sub(self.inner.retention)
            .unwrap_or(SystemTime::UNIX_EPOCH);

        let dir = match fs::read_dir(&self.inner.root) {
            Ok(dir) => dir,
            Err(e) => {
                warn!(root = %self.inner.root.display(), error = %e, "Job root unreadable during cleanup");
                return;
            }
        };

        for entry in dir.flatten() {
            let file_name = entry.file_name();
            let Some(id) = file_name.to_str().and_then(job_id_from_meta) else {
                continue;
            };

            let expired = entry
                .metadata()
                .and_then(|m| m.modified())
                .map(|modified| modified <= cutoff_time)
                .unwrap_or(false);
            if !expired || self.lock().contains_key(id) {
                continue;
            }

            let prefix = format!("{}_", id);
            if let Ok(siblings) = fs::read_dir(&self.inner.root) {
                for sibling in siblings.flatten() {
                    let name = sibling.file_name();
                    if name.to_str().is_some_and(|n| n.starts_with(&prefix)) {
                        remove_quietly(&sibling.path());
                    }
                }
            }
            remove_quietly(&self.inner.root.join(id));
            info!(job = %id, "Expired job removed");
        }
    }
}

struct JobSink {
    registry: JobRegistry,
    id: String,
}

impl ProgressSink for JobSink {
    fn emit(&self, message: &str, percent: Option<u8>) {
        self.registry.record_progress(&self.id, message, percent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name("travel stroller"), "travel_stroller_products.csv");
        assert_eq!(export_file_name(" strollers "), "strollers_products.csv");
    }

    #[test]
    fn test_id_validation() {
        assert!(is_valid_id("a1b2c3d4"));
        assert!(!is_valid_id(""));
        assert!(!is_valid_id("../etc"));
        assert!(!is_valid_id("abc/def"));
    }
}

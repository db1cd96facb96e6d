// * Checkpoint Store - durable per-source progress for resumable runs
// * One JSON document per run workspace, rewritten whole on every mutation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::errors::StorageError;
use crate::config::constants::CHECKPOINT_FILE;

/// Completion status of one source; absence from the map means "not started"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum SourceStatus {
    NotStarted,
    Completed,
    Failed(String),
}

/// Serialized checkpoint document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointState {
    /// Source -> product URLs already extracted
    pub scraped_urls: BTreeMap<String, BTreeSet<String>>,
    /// Source -> terminal status
    pub retailer_status: BTreeMap<String, SourceStatus>,
    pub started_at: DateTime<Utc>,
}

impl CheckpointState {
    fn empty() -> Self {
        Self {
            scraped_urls: BTreeMap::new(),
            retailer_status: BTreeMap::new(),
            started_at: Utc::now(),
        }
    }
}

/// File-backed checkpoint store owned by a single run
#[derive(Debug)]
pub struct CheckpointStore {
    path: PathBuf,
    state: CheckpointState,
}

impl CheckpointStore {
    /// Opens (or creates) the checkpoint in `dir`.
    ///
    /// A missing or unreadable checkpoint file yields empty state; only failing to
    /// create the directory itself is an error.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|e| StorageError::io(dir, e))?;

        let path = dir.join(CHECKPOINT_FILE);
        let state = Self::load(&path);
        Ok(Self { path, state })
    }

    fn load(path: &Path) -> CheckpointState {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return CheckpointState::empty();
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Checkpoint unreadable, starting fresh");
                return CheckpointState::empty();
            }
        };

        match serde_json::from_slice::<CheckpointState>(&bytes) {
            Ok(state) => {
                debug!(
                    path = %path.display(),
                    sources = state.retailer_status.len(),
                    "Checkpoint loaded"
                );
                state
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Checkpoint corrupt, starting fresh");
                CheckpointState::empty()
            }
        }
    }

    // * Overwrite-whole-file flush via temp + rename so a crash never leaves a torn document
    fn flush(&self) -> Result<(), StorageError> {
        let body = serde_json::to_vec_pretty(&self.state)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body).map_err(|e| StorageError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| StorageError::io(&self.path, e))
    }

    /// Clears all state and flushes; used at the start of a non-resumed run
    pub fn reset(&mut self) -> Result<(), StorageError> {
        self.state = CheckpointState::empty();
        self.flush()
    }

    pub fn is_visited(&self, source: &str, url: &str) -> bool {
        self.state
            .scraped_urls
            .get(source)
            .is_some_and(|urls| urls.contains(url))
    }

    /// Records a URL as extracted. Idempotent; only flushes when something changed.
    pub fn mark_visited(&mut self, source: &str, url: &str) -> Result<(), StorageError> {
        let inserted = self
            .state
            .scraped_urls
            .entry(source.to_string())
            .or_default()
            .insert(url.to_string());

        if inserted {
            self.flush()?;
        }
        Ok(())
    }

    pub fn mark_source_done(&mut self, source: &str) -> Result<(), StorageError> {
        self.state
            .retailer_status
            .insert(source.to_string(), SourceStatus::Completed);
        self.flush()
    }

    pub fn mark_source_failed(&mut self, source: &str, reason: &str) -> Result<(), StorageError> {
        self.state
            .retailer_status
            .insert(source.to_string(), SourceStatus::Failed(reason.to_string()));
        self.flush()
    }

    pub fn is_source_done(&self, source: &str) -> bool {
        matches!(
            self.state.retailer_status.get(source),
            Some(SourceStatus::Completed)
        )
    }

    pub fn source_status(&self, source: &str) -> SourceStatus {
        self.state
            .retailer_status
            .get(source)
            .cloned()
            .unwrap_or(SourceStatus::NotStarted)
    }

    /// Number of URLs recorded for a source
    pub fn visited_count(&self, source: &str) -> usize {
        self.state
            .scraped_urls
            .get(source)
            .map_or(0, |urls| urls.len())
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.state.started_at
    }

    pub fn state(&self) -> &CheckpointState {
        &self.state
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

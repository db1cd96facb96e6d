// * On-disk job snapshots: `{root}/{id}_meta.json`, written once a job reaches a terminal state
// * so status and downloads survive a restart.

use crate::jobs::registry::RunJob;
use crate::persistence::errors::StorageError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const META_SUFFIX: &str = "_meta.json";

pub fn meta_path(root: &Path, id: &str) -> PathBuf {
    root.join(format!("{}{}", id, META_SUFFIX))
}

pub fn save_meta(root: &Path, job: &RunJob) -> Result<(), StorageError> {
    let path = meta_path(root, &job.id);
    let tmp = path.with_extension("json.tmp");
    let payload = serde_json::to_vec_pretty(job)?;
    fs::write(&tmp, payload).map_err(|e| StorageError::io(&tmp, e))?;
    fs::rename(&tmp, &path).map_err(|e| StorageError::io(&path, e))?;
    Ok(())
}

// * Missing or unreadable snapshots read as "no such job".
pub fn load_meta(root: &Path, id: &str) -> Option<RunJob> {
    let path = meta_path(root, id);
    let bytes = fs::read(&path).ok()?;
    match serde_json::from_slice(&bytes) {
        Ok(job) => Some(job),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Ignoring corrupt job snapshot");
            None
        }
    }
}

/// Extracts the job id from a snapshot file name
pub fn job_id_from_meta(file_name: &str) -> Option<&str> {
    file_name.strip_suffix(META_SUFFIX).filter(|id| !id.is_empty())
}

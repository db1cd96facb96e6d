use crate::persistence::errors::StorageError;
use thiserror::Error;

// * Control Surface errors; each maps to one caller-visible outcome.
#[derive(Error, Debug)]
pub enum JobError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Job not found: {0} (jobs are kept for 2 hours)")]
    NotFound(String),

    #[error("Job {0} is not running")]
    NotRunning(String),

    #[error("Job {0} is still running")]
    NotReady(String),

    #[error("No export file for job {0}")]
    FileMissing(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

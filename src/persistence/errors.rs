use std::path::PathBuf;
use thiserror::Error;

// * Unified Error type for the Persistence Layer.
// * Every variant is run-fatal: losing the checkpoint or export means losing work.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O failure on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Checkpoint serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}

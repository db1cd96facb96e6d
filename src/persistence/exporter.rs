// * Tabular export - fixed 17-column CSV, UTF-8, written via temp file + rename
// * so anyone tailing the partial export never observes a half-written file.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::errors::StorageError;
use super::schema::{ProductRecord, CSV_HEADERS};

/// Writes `records` to `destination`, replacing any existing file.
///
/// Rows keep input order. Missing parent directories are created.
pub fn export_csv(records: &[ProductRecord], destination: &Path) -> Result<(), StorageError> {
    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
    }

    let tmp = temp_path(destination);
    {
        let mut writer = csv::Writer::from_path(&tmp)?;
        writer.write_record(CSV_HEADERS)?;
        for record in records {
            writer.write_record(record.csv_row())?;
        }
        writer.flush().map_err(|e| StorageError::io(&tmp, e))?;
    }
    fs::rename(&tmp, destination).map_err(|e| StorageError::io(destination, e))?;

    debug!(
        path = %destination.display(),
        rows = records.len(),
        "CSV export written"
    );
    Ok(())
}

fn temp_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    destination.with_file_name(name)
}

// * Persistence: flat files only
// * Checkpoint JSON per run workspace, CSV exports, and the record shapes they carry

pub mod checkpoint;
pub mod errors;
pub mod exporter;
pub mod schema;

pub use checkpoint::{CheckpointState, CheckpointStore, SourceStatus};
pub use errors::StorageError;
pub use exporter::export_csv;
pub use schema::{ProductRecord, RawRecord, CSV_COLUMN_COUNT, CSV_HEADERS};

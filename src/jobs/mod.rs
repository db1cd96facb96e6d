// * Control Surface: submit, observe, steer and download background scrape jobs

pub mod errors;
pub mod events;
pub mod meta;
pub mod registry;

pub use errors::JobError;
pub use events::JobEvent;
pub use registry::{export_file_name, JobRegistry, JobSnapshot, JobStatus, JobSummary, RunJob};

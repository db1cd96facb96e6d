// * Source Adapter seam: one implementation per storefront family.
// * Adapters report failure and never retry internally; the orchestrator owns retry policy.

use crate::network::errors::NetworkError;
use crate::persistence::schema::RawRecord;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Boxed future returned by adapter operations
pub type AdapterFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, AdapterError>> + Send + 'a>>;

/// Per-URL or per-source failure; never fatal to a run
#[derive(Error, Debug)]
pub enum AdapterError {
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("Parse failed: {0}")]
    Parse(String),

    #[error("Adapter panicked: {0}")]
    Panicked(String),
}

impl AdapterError {
    // * Converts a caught panic payload into an error value.
    pub fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let msg = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };
        AdapterError::Panicked(msg)
    }
}

/// Capability set every retailer integration provides
pub trait SourceAdapter: Send + Sync {
    /// Unique source name, as shown to users and stored in checkpoints
    fn name(&self) -> &str;

    /// Collects product page URLs for a keyword (may be empty)
    fn list_product_urls<'a>(&'a self, keyword: &'a str) -> AdapterFuture<'a, Vec<String>>;

    /// Fetches and parses one product page
    fn extract_product<'a>(&'a self, url: &'a str) -> AdapterFuture<'a, RawRecord>;
}

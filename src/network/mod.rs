// * Network Layer: page fetching, URL canonicalization, and the Source Adapter seam

pub mod adapter;
pub mod client;
pub mod errors;
pub mod identity;
pub mod registry;
pub mod storefront;
pub mod urls;

pub use adapter::{AdapterError, AdapterFuture, SourceAdapter};
pub use client::PageClient;
pub use errors::NetworkError;
pub use registry::SourceRegistry;
pub use storefront::StorefrontAdapter;

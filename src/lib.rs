// * stroller-scout: resumable multi-retailer stroller catalog scraper

pub mod config;
pub mod engine;
pub mod jobs;
pub mod network;
pub mod ops;
pub mod persistence;
pub mod refinery;

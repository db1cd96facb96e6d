// * Configuration: tunable constants, static retailer/brand catalog, runtime settings

pub mod catalog;
pub mod constants;
pub mod settings;

pub use catalog::{RetailerEntry, KNOWN_BRANDS, RETAILERS, TRAVEL_KEYWORDS};
pub use settings::ScrapeSettings;

// * Product record shapes: raw adapter output and the normalized export row

use serde::{Deserialize, Serialize};

use crate::config::constants::CURRENCY;

/// Number of columns in the tabular export
pub const CSV_COLUMN_COUNT: usize = 17;

/// Fixed export header, in column order
pub const CSV_HEADERS: [&str; CSV_COLUMN_COUNT] = [
    "Retailer",
    "Brand",
    "Product",
    "Description",
    "Make",
    "Weight",
    "Features",
    "Color",
    "Frame Color",
    "Suitable For",
    "Price",
    "Price (AED)",
    "Currency",
    "Link",
    "Travel Friendly",
    "Image URL",
    "Scraped At",
];

/// Loosely-typed record produced by a source adapter from one product page.
///
/// Empty strings mean "not found". Nothing here is trusted: prices are free text,
/// descriptions may carry markup, weights come in any unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRecord {
    pub brand: String,
    pub title: String,
    pub description: String,
    pub make: String,
    pub weight: String,
    pub features: String,
    pub color: String,
    pub frame_color: String,
    pub suitable_for: String,
    pub price: String,
    pub image_url: String,
    /// Set only when the page explicitly advertises travel use
    pub travel_friendly: bool,
    pub scraped_at: String,
}

impl RawRecord {
    /// Creates a raw record with just a title
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// True when the extractor found nothing usable
    pub fn is_empty(&self) -> bool {
        self.title.trim().is_empty() && self.price.trim().is_empty()
    }
}

/// One normalized product, immutable once appended to a run's record list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub retailer: String,
    pub brand: String,
    pub product: String,
    pub description: String,
    pub make: String,
    pub weight: String,
    pub features: String,
    pub color: String,
    pub frame_color: String,
    pub suitable_for: String,
    /// Display price, e.g. "AED 1,299.00"
    pub price: String,
    pub price_aed: Option<f64>,
    pub currency: String,
    pub link: String,
    pub travel_friendly: bool,
    pub image_url: String,
    pub scraped_at: String,
}

impl Default for ProductRecord {
    fn default() -> Self {
        Self {
            retailer: String::new(),
            brand: String::new(),
            product: String::new(),
            description: String::new(),
            make: String::new(),
            weight: String::new(),
            features: String::new(),
            color: String::new(),
            frame_color: String::new(),
            suitable_for: String::new(),
            price: String::new(),
            price_aed: None,
            currency: CURRENCY.to_string(),
            link: String::new(),
            travel_friendly: false,
            image_url: String::new(),
            scraped_at: String::new(),
        }
    }
}

impl ProductRecord {
    /// Stamps the record with the source it came from and its canonical link
    pub fn stamped(mut self, retailer: &str, link: &str) -> Self {
        self.retailer = retailer.to_string();
        self.link = link.to_string();
        self
    }

    /// "Yes" or empty; the export never says "No"
    pub fn travel_friendly_label(&self) -> &'static str {
        if self.travel_friendly {
            "Yes"
        } else {
            ""
        }
    }

    /// Renders the record as one export row, in `CSV_HEADERS` order
    pub fn csv_row(&self) -> [String; CSV_COLUMN_COUNT] {
        [
            self.retailer.clone(),
            self.brand.clone(),
            self.product.clone(),
            self.description.clone(),
            self.make.clone(),
            self.weight.clone(),
            self.features.clone(),
            self.color.clone(),
            self.frame_color.clone(),
            self.suitable_for.clone(),
            self.price.clone(),
            self.price_aed.map(|p| format!("{:.2}", p)).unwrap_or_default(),
            self.currency.clone(),
            self.link.clone(),
            self.travel_friendly_label().to_string(),
            self.image_url.clone(),
            self.scraped_at.clone(),
        ]
    }
}

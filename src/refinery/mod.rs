// * The Refinery: product page extraction and field normalization
// * Page HTML -> RawRecord (product_page) -> ProductRecord (normalizer)

pub mod normalizer;
pub mod product_page;

// * Re-exports for convenient access
pub use normalizer::{
    infer_brand, infer_travel_friendly, normalize, normalize_at, normalize_price,
    normalize_weight, strip_html,
};
pub use product_page::ProductPageExtractor;

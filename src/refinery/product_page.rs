// * Product Page Extraction
// * Extraction chain: JSON-LD Product -> OpenGraph/product meta -> markup fallbacks + specifications table
// * Every storefront shares this one ordered strategy list.

use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::config::constants::{FEATURE_DELIMITER, MAX_FEATURE_ITEMS};
use crate::persistence::schema::RawRecord;

// * Precompiled selectors
static SELECTOR_JSON_LD: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"script[type="application/ld+json"]"#).unwrap());
static SELECTOR_META: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("meta").unwrap());
static SELECTOR_H1: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1").unwrap());
static SELECTOR_PRICE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(
        r#"[itemprop="price"], .product-price, .price .money, .price-item--sale, .price, [class*="price"]"#,
    )
    .unwrap()
});
static SELECTOR_VENDOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#".product-vendor, [class*="vendor"], [itemprop="brand"]"#).unwrap()
});
static SELECTOR_DESCRIPTION: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(
        r#".product-description, .product__description, [itemprop="description"], [class*="description"]"#,
    )
    .unwrap()
});
static SELECTOR_LIST_ITEM: LazyLock<Selector> = LazyLock::new(|| Selector::parse("li").unwrap());
static SELECTOR_ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static SELECTOR_CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("th, td").unwrap());
static SELECTOR_DT: LazyLock<Selector> = LazyLock::new(|| Selector::parse("dt").unwrap());
static SELECTOR_DD: LazyLock<Selector> = LazyLock::new(|| Selector::parse("dd").unwrap());

/// Partial JSON-LD Product schema
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct JsonLdProduct {
    name: Option<String>,
    description: Option<String>,
    image: Option<JsonLdImage>,
    brand: Option<JsonLdBrand>,
    offers: Option<JsonLdOffers>,
    color: Option<Value>,
    weight: Option<JsonLdWeight>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonLdImage {
    Url(String),
    Array(Vec<JsonLdImage>),
    Object { url: Option<String> },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonLdBrand {
    Name(String),
    Object { name: Option<String> },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonLdOffers {
    // * Sequence first: a struct variant would also accept an array positionally
    Many(Vec<JsonLdOffer>),
    Single(JsonLdOffer),
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct JsonLdOffer {
    price: Option<Value>,
    #[serde(alias = "lowPrice")]
    low_price: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonLdWeight {
    Text(String),
    Quantity {
        value: Option<Value>,
        #[serde(alias = "unitText", alias = "unitCode")]
        unit: Option<String>,
    },
}

/// Extracts a raw product record from a product page
pub struct ProductPageExtractor;

impl ProductPageExtractor {
    /// Runs the full chain; later steps only fill fields earlier steps left empty
    pub fn extract(html: &str) -> RawRecord {
        let document = Html::parse_document(html);
        let mut record = RawRecord::default();

        // * Step 1: JSON-LD (structured data first)
        if let Some(product) = Self::find_json_ld_product(&document) {
            Self::apply_json_ld(product, &mut record);
        }

        // * Step 2: OpenGraph / product meta tags
        Self::apply_meta_tags(&document, &mut record);

        // * Step 3: Markup fallbacks
        Self::apply_fallbacks(&document, &mut record);

        // * Step 4: Specification tables
        Self::apply_spec_table(&document, &mut record);

        record
    }

    /// Finds the first Product node: top-level object, array member, or `@graph` member
    fn find_json_ld_product(document: &Html) -> Option<JsonLdProduct> {
        for script in document.select(&SELECTOR_JSON_LD) {
            let json_text = script.text().collect::<String>();
            let Ok(value) = serde_json::from_str::<Value>(&json_text) else {
                continue;
            };

            let candidates: Vec<&Value> = match &value {
                Value::Array(items) => items.iter().collect(),
                Value::Object(map) => match map.get("@graph") {
                    Some(Value::Array(items)) => items.iter().collect(),
                    _ => vec![&value],
                },
                _ => Vec::new(),
            };

            for candidate in candidates {
                if is_product_node(candidate) {
                    if let Ok(product) = serde_json::from_value::<JsonLdProduct>(candidate.clone()) {
                        return Some(product);
                    }
                }
            }
        }
        None
    }

    fn apply_json_ld(product: JsonLdProduct, record: &mut RawRecord) {
        fill(&mut record.title, product.name);
        fill(&mut record.description, product.description);
        fill(&mut record.image_url, product.image.and_then(image_url));
        fill(&mut record.color, product.color.as_ref().and_then(scalar_text));

        if let Some(brand) = product.brand {
            let name = match brand {
                JsonLdBrand::Name(name) => Some(name),
                JsonLdBrand::Object { name } => name,
            };
            fill(&mut record.brand, name);
        }

        if let Some(offers) = product.offers {
            let offer = match offers {
                JsonLdOffers::Single(offer) => Some(offer),
                JsonLdOffers::Many(offers) => offers.into_iter().next(),
            };
            let price = offer
                .and_then(|o| o.price.or(o.low_price))
                .and_then(|v| scalar_text(&v));
            fill(&mut record.price, price.map(|p| format!("AED {}", p)));
        }

        if let Some(weight) = product.weight {
            let text = match weight {
                JsonLdWeight::Text(text) => Some(text),
                JsonLdWeight::Quantity { value, unit } => value
                    .and_then(|v| scalar_text(&v))
                    .map(|v| format!("{} {}", v, unit.as_deref().map(unit_code).unwrap_or("kg"))),
            };
            fill(&mut record.weight, text);
        }
    }

    fn apply_meta_tags(document: &Html, record: &mut RawRecord) {
        for meta in document.select(&SELECTOR_META) {
            let key = meta
                .value()
                .attr("property")
                .or_else(|| meta.value().attr("name"))
                .unwrap_or("");
            let content = meta.value().attr("content").unwrap_or("").trim();

            if content.is_empty() {
                continue;
            }

            let value = Some(content.to_string());
            match key {
                "og:title" => fill(&mut record.title, value),
                "og:description" | "description" => fill(&mut record.description, value),
                "og:image" => fill(&mut record.image_url, value),
                "product:price:amount" | "og:price:amount" => {
                    fill(&mut record.price, value.map(|p| format!("AED {}", p)))
                }
                "product:brand" => fill(&mut record.brand, value),
                "product:color" => fill(&mut record.color, value),
                _ => {}
            }
        }
    }

    fn apply_fallbacks(document: &Html, record: &mut RawRecord) {
        fill(&mut record.title, first_text(document, &SELECTOR_H1));
        fill(&mut record.price, first_text(document, &SELECTOR_PRICE));
        fill(&mut record.brand, first_text(document, &SELECTOR_VENDOR));

        if let Some(description) = document.select(&SELECTOR_DESCRIPTION).next() {
            fill(&mut record.description, Some(description.inner_html()));

            if record.features.is_empty() {
                let items: Vec<String> = description
                    .select(&SELECTOR_LIST_ITEM)
                    .map(element_text)
                    .filter(|t| !t.is_empty())
                    .take(MAX_FEATURE_ITEMS)
                    .collect();
                record.features = items.join(FEATURE_DELIMITER);
            }
        }
    }

    /// Reads label/value pairs from `<tr>` rows and `<dl>` lists
    fn apply_spec_table(document: &Html, record: &mut RawRecord) {
        let mut specs: HashMap<String, String> = HashMap::new();

        for row in document.select(&SELECTOR_ROW) {
            let cells: Vec<String> = row.select(&SELECTOR_CELL).map(element_text).collect();
            if let [label, .., value] = cells.as_slice() {
                if !label.is_empty() && !value.is_empty() && label != value {
                    specs.insert(spec_key(label), value.clone());
                }
            }
        }

        let terms = document.select(&SELECTOR_DT).map(element_text);
        let definitions = document.select(&SELECTOR_DD).map(element_text);
        for (label, value) in terms.zip(definitions) {
            if !label.is_empty() && !value.is_empty() {
                specs.insert(spec_key(&label), value);
            }
        }

        for (key, value) in specs {
            let target = match key.as_str() {
                "weight" | "product weight" | "stroller weight" => &mut record.weight,
                "color" | "colour" => &mut record.color,
                "frame color" | "frame colour" | "chassis colour" => &mut record.frame_color,
                "age" | "suitable for" | "age range" | "suitable from" => &mut record.suitable_for,
                "brand" => &mut record.brand,
                _ => continue,
            };
            fill(target, Some(value));
        }
    }
}

fn is_product_node(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(t)) => t == "Product" || t == "ProductGroup",
        Some(Value::Array(types)) => types
            .iter()
            .any(|t| matches!(t.as_str(), Some("Product") | Some("ProductGroup"))),
        _ => false,
    }
}

fn image_url(image: JsonLdImage) -> Option<String> {
    match image {
        JsonLdImage::Url(url) => Some(url),
        JsonLdImage::Object { url } => url,
        JsonLdImage::Array(images) => images.into_iter().next().and_then(image_url),
    }
}

// * UN/CEFACT unit codes seen in schema.org weights
fn unit_code(unit: &str) -> &str {
    match unit {
        "KGM" => "kg",
        "LBR" => "lb",
        "GRM" => "g",
        other => other,
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn spec_key(label: &str) -> String {
    label.trim().trim_end_matches(':').trim().to_lowercase()
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .map(element_text)
        .find(|t| !t.is_empty())
}

// * Only fills empty slots; earlier strategies win
fn fill(slot: &mut String, value: Option<String>) {
    if slot.trim().is_empty() {
        if let Some(v) = value {
            let v = v.trim();
            if !v.is_empty() {
                *slot = v.to_string();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_ld_product_extraction() {
        let html = r#"
            <html><head>
            <script type="application/ld+json">
            {
                "@type": "Product",
                "name": "Cybex Mios Stroller",
                "description": "<p>Urban stroller</p>",
                "image": ["https://cdn.example.com/mios.jpg"],
                "brand": {"@type": "Brand", "name": "Cybex"},
                "offers": {"@type": "Offer", "price": 3999, "priceCurrency": "AED"},
                "color": "Deep Black"
            }
            </script>
            </head><body><h1>Ignored heading</h1></body></html>
        "#;

        let record = ProductPageExtractor::extract(html);
        assert_eq!(record.title, "Cybex Mios Stroller");
        assert_eq!(record.brand, "Cybex");
        assert_eq!(record.price, "AED 3999");
        assert_eq!(record.image_url, "https://cdn.example.com/mios.jpg");
        assert_eq!(record.color, "Deep Black");
    }

    #[test]
    fn test_json_ld_graph_and_offer_list() {
        let html = r#"
            <script type="application/ld+json">
            {"@graph": [
                {"@type": "BreadcrumbList"},
                {"@type": "Product", "name": "Joie Pact", "brand": "Joie",
                 "offers": [{"price": "1,099.00"}],
                 "weight": {"@type": "QuantitativeValue", "value": 6, "unitCode": "KGM"}}
            ]}
            </script>
        "#;

        let record = ProductPageExtractor::extract(html);
        assert_eq!(record.title, "Joie Pact");
        assert_eq!(record.brand, "Joie");
        assert_eq!(record.price, "AED 1,099.00");
        assert_eq!(record.weight, "6 kg");
    }

    #[test]
    fn test_meta_tags_fill_gaps() {
        let html = r#"
            <html><head>
                <meta property="og:title" content="Babyzen YOYO2"/>
                <meta property="og:image" content="https://cdn.example.com/yoyo.jpg"/>
                <meta property="product:price:amount" content="2650.00"/>
            </head><body></body></html>
        "#;

        let record = ProductPageExtractor::extract(html);
        assert_eq!(record.title, "Babyzen YOYO2");
        assert_eq!(record.price, "AED 2650.00");
        assert_eq!(record.image_url, "https://cdn.example.com/yoyo.jpg");
    }

    #[test]
    fn test_markup_fallbacks_and_features() {
        let html = r#"
            <html><body>
                <h1> Silver Cross Jet 3 </h1>
                <span class="price">Dhs. 2,499</span>
                <div class="product-description">
                    <ul><li>Cabin approved</li><li>One-hand fold</li></ul>
                </div>
            </body></html>
        "#;

        let record = ProductPageExtractor::extract(html);
        assert_eq!(record.title, "Silver Cross Jet 3");
        assert_eq!(record.price, "Dhs. 2,499");
        assert_eq!(record.features, "Cabin approved ; One-hand fold");
        assert!(record.description.contains("<li>"));
    }

    #[test]
    fn test_spec_table_fields() {
        let html = r#"
            <html><body>
                <h1>Maclaren Techno XT</h1>
                <table>
                    <tr><th>Weight:</th><td>6.6 kg</td></tr>
                    <tr><th>Frame Colour</th><td>Silver</td></tr>
                </table>
                <dl><dt>Suitable For</dt><dd>0-4 years</dd></dl>
            </body></html>
        "#;

        let record = ProductPageExtractor::extract(html);
        assert_eq!(record.weight, "6.6 kg");
        assert_eq!(record.frame_color, "Silver");
        assert_eq!(record.suitable_for, "0-4 years");
    }

    #[test]
    fn test_empty_page_yields_empty_record() {
        assert!(ProductPageExtractor::extract("<html><body></body></html>").is_empty());
    }
}

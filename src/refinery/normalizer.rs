// * Field Normalization - raw adapter text -> canonical export values
// * Pure and deterministic except `normalize`, which stamps "now" when no capture
// * time is present; use `normalize_at` to pin the clock.

use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;
use std::sync::LazyLock;

use crate::config::catalog::{KNOWN_BRANDS, TRAVEL_KEYWORDS};
use crate::config::constants::CURRENCY;
use crate::persistence::schema::{ProductRecord, RawRecord};

const LB_TO_KG: f64 = 0.453592;

// * Raw gram values above this cannot plausibly be kilograms
const GRAMS_THRESHOLD: f64 = 100.0;

// * Currency markers stripped before number extraction (longest first)
const CURRENCY_MARKERS: &[&str] = &["AED", "د.إ", "Dhs.", "Dhs"];

static NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").unwrap());

static WEIGHT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)\s*(kg|kgs|kilograms?|lbs?|pounds?|g|grams?)").unwrap()
});

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Parses a free-text price into ("AED 1,299.00", Some(1299.0)).
///
/// The first number wins, so "was/now" strings yield the first listed price.
/// Text without any number is returned trimmed with `None`.
pub fn normalize_price(price_text: &str) -> (String, Option<f64>) {
    if price_text.trim().is_empty() {
        return (String::new(), None);
    }

    let mut cleaned = price_text.to_string();
    for marker in CURRENCY_MARKERS {
        cleaned = cleaned.replace(marker, "");
    }
    let cleaned = cleaned.replace(',', "");

    let numeric = NUMBER_REGEX
        .find(&cleaned)
        .and_then(|m| m.as_str().parse::<f64>().ok());

    match numeric {
        Some(value) => (format!("{} {}", CURRENCY, format_thousands(value)), Some(value)),
        None => (price_text.trim().to_string(), None),
    }
}

// * Two decimals with comma thousands separators: 1299.0 -> "1,299.00"
fn format_thousands(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}.{}", grouped, frac_part)
}

/// Converts a weight string to "<x.y> kg".
///
/// Pounds are converted; grams only when the value is implausible as kilograms
/// (> 100). Unrecognized input is returned trimmed and lowercased.
pub fn normalize_weight(weight: &str) -> String {
    let lowered = weight.trim().to_lowercase();
    if lowered.is_empty() {
        return String::new();
    }

    let Some(caps) = WEIGHT_REGEX.captures(&lowered) else {
        return lowered;
    };
    let Ok(mut value) = caps[1].parse::<f64>() else {
        return lowered;
    };
    let unit = &caps[2];

    if unit.starts_with("lb") || unit.starts_with("pound") {
        value *= LB_TO_KG;
    } else if unit.starts_with('g') && value > GRAMS_THRESHOLD {
        value /= 1000.0;
    }

    format!("{:.1} kg", value)
}

/// Removes markup tags and collapses whitespace
pub fn strip_html(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let without_tags = TAG_REGEX.replace_all(text, " ");
    WHITESPACE_REGEX
        .replace_all(&without_tags, " ")
        .trim()
        .to_string()
}

/// First brand of the canonical list found in the title; list order breaks ties
pub fn infer_brand(title: &str) -> String {
    let title_lower = title.to_lowercase();
    KNOWN_BRANDS
        .iter()
        .find(|brand| title_lower.contains(&brand.to_lowercase()))
        .map(|brand| brand.to_string())
        .unwrap_or_default()
}

/// True when any travel keyword appears in the title, features or description
pub fn infer_travel_friendly(title: &str, features: &str, description: &str) -> bool {
    let haystack = format!("{} {} {}", title, features, description).to_lowercase();
    TRAVEL_KEYWORDS.iter().any(|kw| haystack.contains(kw))
}

/// Normalizes a raw record, stamping missing capture times with the current time
pub fn normalize(raw: RawRecord) -> ProductRecord {
    normalize_at(raw, Utc::now())
}

/// Normalizes a raw record with an explicit clock.
///
/// Brand and travel inference read the raw title/features/description; the title
/// itself is never rewritten.
pub fn normalize_at(raw: RawRecord, now: DateTime<Utc>) -> ProductRecord {
    let (price, price_aed) = normalize_price(&raw.price);

    let brand = if raw.brand.trim().is_empty() && !raw.title.is_empty() {
        infer_brand(&raw.title)
    } else {
        raw.brand.trim().to_string()
    };

    let make = if raw.make.trim().is_empty() {
        brand.clone()
    } else {
        raw.make.trim().to_string()
    };

    let travel_friendly = raw.travel_friendly
        || infer_travel_friendly(&raw.title, &raw.features, &raw.description);

    let weight = if raw.weight.is_empty() {
        String::new()
    } else {
        normalize_weight(&raw.weight)
    };

    let scraped_at = if raw.scraped_at.trim().is_empty() {
        now.to_rfc3339_opts(SecondsFormat::Secs, true)
    } else {
        raw.scraped_at
    };

    ProductRecord {
        retailer: String::new(),
        brand,
        product: raw.title,
        description: strip_html(&raw.description),
        make,
        weight,
        features: strip_html(&raw.features),
        color: raw.color,
        frame_color: raw.frame_color,
        suitable_for: raw.suitable_for,
        price,
        price_aed,
        currency: CURRENCY.to_string(),
        link: String::new(),
        travel_friendly,
        image_url: raw.image_url,
        scraped_at,
    }
}

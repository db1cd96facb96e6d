use chrono::{TimeZone, Utc};
use stroller_scout::persistence::RawRecord;
use stroller_scout::refinery::{
    infer_brand, infer_travel_friendly, normalize_at, normalize_price, normalize_weight,
};

// * Test Suite for field normalization

#[test]
fn test_price_variants_agree() {
    for input in ["AED 1,299", "1299.00 AED", "د.إ 1,299", "Dhs. 1299"] {
        let (display, value) = normalize_price(input);
        assert_eq!(display, "AED 1,299.00", "input: {}", input);
        assert_eq!(value, Some(1299.0), "input: {}", input);
    }
}

#[test]
fn test_price_without_number_kept_verbatim() {
    assert_eq!(normalize_price("  Call for price "), ("Call for price".to_string(), None));
    assert_eq!(normalize_price(""), (String::new(), None));
}

#[test]
fn test_price_first_number_wins() {
    let (display, value) = normalize_price("Was AED 2,450 Now AED 1,960");
    assert_eq!(display, "AED 2,450.00");
    assert_eq!(value, Some(2450.0));
}

#[test]
fn test_weight_units() {
    assert_eq!(normalize_weight("7.3kg"), "7.3 kg");
    assert_eq!(normalize_weight("16 lbs"), "7.3 kg");
    assert_eq!(normalize_weight("6200 g"), "6.2 kg");
    assert_eq!(normalize_weight("6.2 Kilograms"), "6.2 kg");
}

#[test]
fn test_small_gram_value_not_divided() {
    assert_eq!(normalize_weight("7 g"), "7.0 kg");
}

#[test]
fn test_weight_unrecognized_lowercased() {
    assert_eq!(normalize_weight("  Very Light "), "very light");
}

#[test]
fn test_brand_list_order_wins() {
    assert_eq!(infer_brand("Bugaboo Fox 5 Complete"), "Bugaboo");
    assert_eq!(infer_brand("Silver Cross Reef"), "Silver Cross");
    assert_eq!(infer_brand("Generic pushchair"), "");
}

#[test]
fn test_travel_inference() {
    assert!(infer_travel_friendly("Babyzen YOYO2", "Cabin Size fold", ""));
    assert!(infer_travel_friendly("", "", "Approved for airplane overhead bins"));
    assert!(!infer_travel_friendly("Stokke Xplory", "Height adjustable", "Premium ride"));
}

#[test]
fn test_normalize_fills_derived_fields() {
    let now = Utc.with_ymd_and_hms(2026, 1, 15, 9, 30, 0).unwrap();
    let raw = RawRecord {
        title: "Joie Parcel Travel Stroller".to_string(),
        price: "AED 899".to_string(),
        weight: "13.2 lb".to_string(),
        description: "<p>Folds   small</p>".to_string(),
        ..RawRecord::default()
    };

    let record = normalize_at(raw, now);
    assert_eq!(record.brand, "Joie");
    assert_eq!(record.make, "Joie");
    assert_eq!(record.price, "AED 899.00");
    assert_eq!(record.price_aed, Some(899.0));
    assert_eq!(record.currency, "AED");
    assert_eq!(record.weight, "6.0 kg");
    assert_eq!(record.description, "Folds small");
    assert!(record.travel_friendly);
    assert_eq!(record.scraped_at, "2026-01-15T09:30:00Z");
}

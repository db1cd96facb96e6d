use stroller_scout::persistence::{export_csv, ProductRecord, CSV_HEADERS};
use tempfile::TempDir;

// * Test Suite for CSV export fidelity

fn record(product: &str, description: &str) -> ProductRecord {
    ProductRecord {
        retailer: "Mumzworld".to_string(),
        brand: "Cybex".to_string(),
        product: product.to_string(),
        description: description.to_string(),
        price: "AED 3,150.00".to_string(),
        price_aed: Some(3150.0),
        link: "https://www.mumzworld.com/en/cybex-priam.html".to_string(),
        travel_friendly: true,
        ..ProductRecord::default()
    }
}

#[test]
fn test_awkward_text_round_trips() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("out.csv");
    let tricky = "Priam, \"Lux\" edition\nSecond line";
    let arabic = "عربة أطفال خفيفة للسفر";

    export_csv(&[record(tricky, arabic)], &path).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
    assert_eq!(headers, CSV_HEADERS);

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][2], tricky);
    assert_eq!(&rows[0][3], arabic);
    assert_eq!(&rows[0][11], "3150.00");
    assert_eq!(&rows[0][12], "AED");
    assert_eq!(&rows[0][14], "Yes");
}

#[test]
fn test_rows_follow_input_order() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("out.csv");
    let records: Vec<ProductRecord> = ["Gazelle S", "Priam", "Libelle"]
        .iter()
        .map(|name| record(name, ""))
        .collect();

    export_csv(&records, &path).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let products: Vec<String> = reader
        .records()
        .map(|r| r.unwrap()[2].to_string())
        .collect();
    assert_eq!(products, vec!["Gazelle S", "Priam", "Libelle"]);
}

#[test]
fn test_missing_price_is_blank() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("out.csv");
    let mut r = record("Eezy S Twist", "");
    r.price = "Call for price".to_string();
    r.price_aed = None;
    r.travel_friendly = false;

    export_csv(&[r], &path).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let row = reader.records().next().unwrap().unwrap();
    assert_eq!(&row[10], "Call for price");
    assert_eq!(&row[11], "");
    assert_eq!(&row[14], "");
}

use stroller_scout::network::urls::{canonical_product_url, dedup_preserving_order, paginated_url};

// * Test Suite for product URL canonicalization

#[test]
fn test_basic_join() {
    let base = "https://www.mumzworld.com/en/travel-gear/strollers-prams";
    let href = "/en/bugaboo-fox-5.html";
    assert_eq!(
        canonical_product_url(href, base).unwrap(),
        "https://www.mumzworld.com/en/bugaboo-fox-5.html"
    );
}

#[test]
fn test_strip_fragment() {
    let base = "https://example.ae";
    assert_eq!(canonical_product_url("page#reviews", base).unwrap(), "https://example.ae/page");
}

#[test]
fn test_lowercase_host() {
    let base = "https://EXAMPLE.ae";
    assert_eq!(canonical_product_url("/page", base).unwrap(), "https://example.ae/page");
}

#[test]
fn test_variant_query_collapses() {
    let base = "https://example.ae";
    let a = canonical_product_url("/products/yoyo?variant=1", base).unwrap();
    let b = canonical_product_url("/products/yoyo?variant=2&utm_source=ig", base).unwrap();
    assert_eq!(a, b);
    assert_eq!(dedup_preserving_order(vec![a, b]).len(), 1);
}

#[test]
fn test_invalid_base() {
    assert_eq!(canonical_product_url("page", "not_a_url"), None);
}

#[test]
fn test_mumzworld_style_pagination() {
    assert_eq!(
        paginated_url("https://www.mumzworld.com/en/travel-gear/strollers-prams", "p", 2),
        "https://www.mumzworld.com/en/travel-gear/strollers-prams?p=2"
    );
}

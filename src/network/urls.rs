use std::collections::HashSet;
use url::form_urlencoded;
use url::Url;

// * Canonicalizes a product link so the same page always maps to one checkpoint key.
// *
// * Logic:
// * 1. Join href with base_url.
// * 2. Strip Fragment (#) and Query (?) (variant selectors, tracking, sort state).
// * 3. Lowercase Hostname.
// * 4. Only http(s) survives.
pub fn canonical_product_url(href: &str, base_url: &str) -> Option<String> {
    let base = Url::parse(base_url).ok()?;
    let mut url = base.join(href.trim()).ok()?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }

    url.set_fragment(None);
    url.set_query(None);

    // * DNS is case-insensitive, but checkpoint keys are not.
    if let Some(host) = url.host_str() {
        let lower_host = host.to_lowercase();
        url.set_host(Some(&lower_host)).ok()?;
    }

    Some(url.to_string())
}

// * True when `url` lives on the same host as `base_url` (ASCII case-insensitive).
pub fn same_site(url: &str, base_url: &str) -> bool {
    match (Url::parse(url), Url::parse(base_url)) {
        (Ok(url), Ok(base)) => match (url.host_str(), base.host_str()) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            _ => false,
        },
        _ => false,
    }
}

// * Drops repeated links while keeping first-seen order (listing order matters for resume).
pub fn dedup_preserving_order(urls: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(urls.len());
    urls.into_iter().filter(|u| seen.insert(u.clone())).collect()
}

// * Page 1 is the bare listing URL; later pages append `{param}={page}`.
pub fn paginated_url(url: &str, param: &str, page: usize) -> String {
    if page <= 1 {
        return url.to_string();
    }
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{}{}{}={}", url, sep, param, page)
}

// * Fills the `{keyword}` placeholder of a search template with the form-encoded keyword.
pub fn search_url(template: &str, keyword: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(keyword.trim().as_bytes()).collect();
    template.replace("{keyword}", &encoded)
}

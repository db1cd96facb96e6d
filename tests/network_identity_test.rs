use reqwest::header::HeaderMap;
use stroller_scout::config::catalog::USER_AGENTS;
use stroller_scout::network::identity::IdentityProfile;

#[test]
fn test_random_profile_uses_catalog_agent() {
    let profile = IdentityProfile::random();
    assert!(USER_AGENTS.contains(&profile.user_agent));
    assert!(profile.accept_language.starts_with("en-AE"));
}

#[test]
fn test_apply_to_headers_integrity() {
    let profile = IdentityProfile::random();
    let mut headers = HeaderMap::new();
    profile.apply_to_headers(&mut headers);

    let ua = headers.get("User-Agent").unwrap().to_str().unwrap();
    assert_eq!(ua, profile.user_agent);
    assert_eq!(headers.get("Upgrade-Insecure-Requests").unwrap(), "1");
}

use rand::seq::SliceRandom;
use reqwest::header::{HeaderMap, HeaderValue};

use crate::config::catalog::USER_AGENTS;

// * IdentityProfile defines the browser characteristics presented to storefronts.
pub struct IdentityProfile {
    pub user_agent: &'static str,
    pub accept_language: &'static str,
}

impl IdentityProfile {
    // * Picks a random desktop user agent with a UAE English locale.
    pub fn random() -> Self {
        let user_agent = USER_AGENTS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(USER_AGENTS[0]);

        Self {
            user_agent,
            accept_language: "en-AE,en;q=0.9,ar;q=0.6",
        }
    }

    // * Applies the configured profile to a mutable HeaderMap.
    pub fn apply_to_headers(&self, headers: &mut HeaderMap) {
        headers.insert(
            "User-Agent",
            HeaderValue::from_static(self.user_agent),
        );
        headers.insert(
            "Accept-Language",
            HeaderValue::from_static(self.accept_language),
        );
        headers.insert(
            "Accept",
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert("Upgrade-Insecure-Requests", HeaderValue::from_static("1"));
    }
}

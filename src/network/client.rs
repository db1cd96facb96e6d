use crate::config::constants::{MIN_BODY_BYTES, PAGE_TIMEOUT_MS};
use crate::network::errors::NetworkError;
use crate::network::identity::IdentityProfile;
use regex::Regex;
use reqwest::header::HeaderMap;
use reqwest::Client;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::debug;

static BAN_TITLE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<title>[^<]*(Just a moment|Attention Required|Security Check|Access Denied|Captcha)")
        .unwrap()
});

const BAN_SIGNATURES: &[&str] = &["captcha-delivery", "cf-turnstile", "datadome", "challenge-platform"];

// * Shared HTTP page client used by every storefront adapter.
pub struct PageClient {
    inner: Client,
    timeout_ms: u64,
}

impl PageClient {
    // * Initializes the client with a rotated browser identity and a per-request timeout.
    pub fn new() -> Result<Self, NetworkError> {
        Self::with_timeout(PAGE_TIMEOUT_MS)
    }

    pub fn with_timeout(timeout_ms: u64) -> Result<Self, NetworkError> {
        let mut headers = HeaderMap::new();
        IdentityProfile::random().apply_to_headers(&mut headers);

        let inner = Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_millis(timeout_ms))
            .build()?;

        Ok(Self { inner, timeout_ms })
    }

    // * Fetches a URL and validates the response against ban rules.
    pub async fn fetch(&self, url: &str) -> Result<String, NetworkError> {
        let resp = self.inner.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                NetworkError::Timeout(self.timeout_ms)
            } else {
                NetworkError::Request(e)
            }
        })?;
        let status = resp.status();

        if status.as_u16() == 403 || status.as_u16() == 429 {
            return Err(NetworkError::HardBan(status.as_u16()));
        }

        if !status.is_success() {
            return Err(NetworkError::Status(status.as_u16()));
        }

        let body = resp.text().await?;
        debug!(url = url, bytes = body.len(), "Page fetched");

        if body.len() < MIN_BODY_BYTES {
            return Err(NetworkError::EmptyResponse(MIN_BODY_BYTES));
        }

        detect_soft_ban(&body)?;

        Ok(body)
    }
}

// * Challenge pages come back 200 OK; recognise them by title and vendor markers.
pub fn detect_soft_ban(body: &str) -> Result<(), NetworkError> {
    if let Some(cap) = BAN_TITLE_REGEX.captures(body) {
        return Err(NetworkError::SoftBan(format!("Title Trigger: {}", &cap[1])));
    }

    for sig in BAN_SIGNATURES {
        if body.contains(sig) {
            return Err(NetworkError::SoftBan(format!("Body Trigger: {}", sig)));
        }
    }

    Ok(())
}

// * Data-driven HTTP adapter shared by every catalogued retailer.
// * One profile per retailer (URLs, link selector, pagination parameter); one extraction strategy.

use crate::config::catalog::RetailerEntry;
use crate::config::constants::{
    DEFAULT_KEYWORD, LISTING_DELAY_MAX_MS, LISTING_DELAY_MIN_MS, MAX_LISTING_PAGES,
};
use crate::engine::politeness::jittered_pause;
use crate::network::adapter::{AdapterError, AdapterFuture, SourceAdapter};
use crate::network::client::PageClient;
use crate::network::urls::{
    canonical_product_url, dedup_preserving_order, paginated_url, same_site, search_url,
};
use crate::persistence::schema::RawRecord;
use crate::refinery::product_page::ProductPageExtractor;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct StorefrontAdapter {
    profile: RetailerEntry,
    client: Arc<PageClient>,
    link_selector: Selector,
    max_pages: usize,
    listing_delay: (Duration, Duration),
}

impl StorefrontAdapter {
    pub fn new(profile: RetailerEntry, client: Arc<PageClient>) -> Result<Self, AdapterError> {
        let link_selector = Selector::parse(profile.link_selector).map_err(|_| {
            AdapterError::Parse(format!("invalid link selector for {}: {}", profile.name, profile.link_selector))
        })?;

        Ok(Self {
            profile,
            client,
            link_selector,
            max_pages: MAX_LISTING_PAGES,
            listing_delay: (
                Duration::from_millis(LISTING_DELAY_MIN_MS),
                Duration::from_millis(LISTING_DELAY_MAX_MS),
            ),
        })
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    pub fn with_listing_delay(mut self, min: Duration, max: Duration) -> Self {
        self.listing_delay = (min, max.max(min));
        self
    }

    pub fn profile(&self) -> &RetailerEntry {
        &self.profile
    }

    // * The default keyword browses the curated category; anything else goes through site search.
    pub fn start_url(&self, keyword: &str) -> String {
        let keyword = keyword.trim();
        if keyword.is_empty() || keyword.eq_ignore_ascii_case(DEFAULT_KEYWORD) {
            self.profile.listing_url.to_string()
        } else {
            search_url(self.profile.search_url, keyword)
        }
    }

    async fn collect_listing(&self, keyword: &str) -> Result<Vec<String>, AdapterError> {
        let start = self.start_url(keyword);
        let mut seen: HashSet<String> = HashSet::new();
        let mut ordered: Vec<String> = Vec::new();

        for page in 1..=self.max_pages {
            let page_url = paginated_url(&start, self.profile.page_param, page);

            let body = match self.client.fetch(&page_url).await {
                Ok(body) => body,
                // ! First page failure means the source is unreachable
                Err(e) if page == 1 => return Err(e.into()),
                Err(e) => {
                    warn!(source = self.profile.name, page = page, error = %e, "Listing page failed, stopping pagination");
                    break;
                }
            };

            let links = self.retailer_links(&body, &page_url);
            let before = ordered.len();
            for link in links {
                if seen.insert(link.clone()) {
                    ordered.push(link);
                }
            }

            let added = ordered.len() - before;
            debug!(source = self.profile.name, page = page, added = added, "Listing page parsed");

            // * A page with nothing new is either the end or a redirect back to page 1
            if added == 0 {
                break;
            }

            if page < self.max_pages {
                jittered_pause(self.listing_delay.0, self.listing_delay.1).await;
            }
        }

        info!(source = self.profile.name, urls = ordered.len(), "Listing collected");
        Ok(ordered)
    }

    // * Product links on a listing page, minus anything hosted off the retailer's site
    fn retailer_links(&self, body: &str, page_url: &str) -> Vec<String> {
        collect_links(body, &self.link_selector, page_url)
            .into_iter()
            .filter(|link| same_site(link, self.profile.base_url))
            .collect()
    }

    async fn fetch_product(&self, url: &str) -> Result<RawRecord, AdapterError> {
        let body = self.client.fetch(url).await?;
        parse_product(&body)
    }
}

impl SourceAdapter for StorefrontAdapter {
    fn name(&self) -> &str {
        self.profile.name
    }

    fn list_product_urls<'a>(&'a self, keyword: &'a str) -> AdapterFuture<'a, Vec<String>> {
        Box::pin(self.collect_listing(keyword))
    }

    fn extract_product<'a>(&'a self, url: &'a str) -> AdapterFuture<'a, RawRecord> {
        Box::pin(self.fetch_product(url))
    }
}

// * Html is !Send, so all DOM work stays in sync helpers between awaits.
pub fn collect_links(body: &str, selector: &Selector, page_url: &str) -> Vec<String> {
    let document = Html::parse_document(body);
    let links = document
        .select(selector)
        .filter_map(|el| el.value().attr("href"))
        .filter_map(|href| canonical_product_url(href, page_url))
        .collect();
    dedup_preserving_order(links)
}

pub fn parse_product(body: &str) -> Result<RawRecord, AdapterError> {
    let record = ProductPageExtractor::extract(body);
    if record.is_empty() {
        return Err(AdapterError::Parse("no product data on page".to_string()));
    }
    Ok(record)
}

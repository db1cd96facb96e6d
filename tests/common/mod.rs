#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use stroller_scout::network::{AdapterError, AdapterFuture, NetworkError, SourceAdapter, SourceRegistry};
use stroller_scout::persistence::RawRecord;

type Hook = Box<dyn Fn() + Send + Sync>;

// * Scripted adapter: fixed URL list, optional listing failure, per-URL failures and hooks.
pub struct MockAdapter {
    name: String,
    urls: Vec<String>,
    listing_error: Option<String>,
    listing_panics: bool,
    // * Remaining failures per URL before it succeeds
    failures: Mutex<HashMap<String, u32>>,
    hooks: HashMap<String, Hook>,
    pub list_calls: AtomicUsize,
    pub extract_calls: AtomicUsize,
    pub extract_calls_by_url: Mutex<HashMap<String, usize>>,
}

impl MockAdapter {
    pub fn new(name: &str, url_count: usize) -> Self {
        let slug = name.to_lowercase().replace(' ', "-");
        let urls = (1..=url_count)
            .map(|i| format!("https://{}.test/products/{}", slug, i))
            .collect();
        Self {
            name: name.to_string(),
            urls,
            listing_error: None,
            listing_panics: false,
            failures: Mutex::new(HashMap::new()),
            hooks: HashMap::new(),
            list_calls: AtomicUsize::new(0),
            extract_calls: AtomicUsize::new(0),
            extract_calls_by_url: Mutex::new(HashMap::new()),
        }
    }

    pub fn url(&self, index: usize) -> String {
        self.urls[index - 1].clone()
    }

    pub fn failing_listing(mut self, reason: &str) -> Self {
        self.listing_error = Some(reason.to_string());
        self
    }

    pub fn panicking_listing(mut self) -> Self {
        self.listing_panics = true;
        self
    }

    /// URL number `index` (1-based) fails `times` times before succeeding
    pub fn flaky(self, index: usize, times: u32) -> Self {
        let url = self.url(index);
        self.failures.lock().unwrap().insert(url, times);
        self
    }

    /// Runs `hook` right after URL number `index` (1-based) is extracted
    pub fn on_extract(mut self, index: usize, hook: impl Fn() + Send + Sync + 'static) -> Self {
        let url = self.url(index);
        self.hooks.insert(url, Box::new(hook));
        self
    }

    pub fn calls_for(&self, index: usize) -> usize {
        let url = self.url(index);
        *self.extract_calls_by_url.lock().unwrap().get(&url).unwrap_or(&0)
    }

    pub fn total_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst) + self.extract_calls.load(Ordering::SeqCst)
    }

    fn extract_now(&self, url: &str) -> Result<RawRecord, AdapterError> {
        self.extract_calls.fetch_add(1, Ordering::SeqCst);
        *self
            .extract_calls_by_url
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_insert(0) += 1;

        {
            let mut failures = self.failures.lock().unwrap();
            if let Some(remaining) = failures.get_mut(url) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(NetworkError::Timeout(30_000).into());
                }
            }
        }

        let index = url.rsplit('/').next().unwrap_or("0");
        let record = RawRecord {
            title: format!("{} Stroller {}", self.name, index),
            price: "AED 1,299".to_string(),
            description: "<p>Compact fold, one hand</p>".to_string(),
            weight: "7.5 kg".to_string(),
            ..RawRecord::default()
        };

        if let Some(hook) = self.hooks.get(url) {
            hook();
        }
        Ok(record)
    }
}

impl SourceAdapter for MockAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn list_product_urls<'a>(&'a self, _keyword: &'a str) -> AdapterFuture<'a, Vec<String>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let result = match (&self.listing_error, self.listing_panics) {
            (_, true) => panic!("listing selector blew up"),
            (Some(reason), _) => Err(AdapterError::Parse(reason.clone())),
            (None, _) => Ok(self.urls.clone()),
        };
        Box::pin(async move { result })
    }

    fn extract_product<'a>(&'a self, url: &'a str) -> AdapterFuture<'a, RawRecord> {
        Box::pin(async move { self.extract_now(url) })
    }
}

pub fn registry_of(adapters: &[Arc<MockAdapter>]) -> Arc<SourceRegistry> {
    let mut registry = SourceRegistry::new();
    for adapter in adapters {
        registry.register(adapter.clone());
    }
    Arc::new(registry)
}

pub fn names(adapters: &[Arc<MockAdapter>]) -> Vec<String> {
    adapters.iter().map(|a| a.name().to_string()).collect()
}

use crate::config::catalog::RETAILERS;
use crate::network::adapter::{AdapterError, SourceAdapter};
use crate::network::client::PageClient;
use crate::network::storefront::StorefrontAdapter;
use std::collections::HashMap;
use std::sync::Arc;

// * Dispatch table from source name to adapter.
// * Names keep registration order so `--list` and "all retailers" runs are stable.
#[derive(Default, Clone)]
pub struct SourceRegistry {
    adapters: HashMap<String, Arc<dyn SourceAdapter>>,
    order: Vec<String>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // * Registers every catalogued retailer behind one shared page client.
    pub fn with_storefronts(client: Arc<PageClient>) -> Result<Self, AdapterError> {
        let mut registry = Self::new();
        for entry in RETAILERS {
            registry.register(Arc::new(StorefrontAdapter::new(*entry, Arc::clone(&client))?));
        }
        Ok(registry)
    }

    /// Adds an adapter; a later registration under the same name replaces the earlier one
    pub fn register(&mut self, adapter: Arc<dyn SourceAdapter>) {
        let name = adapter.name().to_string();
        if self.adapters.insert(name.clone(), adapter).is_none() {
            self.order.push(name);
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn SourceAdapter>> {
        self.adapters.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.adapters.contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.order.clone()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

use crate::{
    cache::InMemoryCache,
    client::{Client, ClientImpl}
};
use std::sync::Arc;

pub struct ClientBuilder {
    url: String,
    cache: Option<InMemoryCache>
}

impl ClientBuilder {
    pub fn new<U: Into<String>>(url: U) -> Self {
        ClientBuilder {
            url: url.into(),
            cache: None
        }
    }

    /// Start out with an already populated cache instead of an empty one.
    pub fn with_cache(mut self, cache: InMemoryCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn build(self) -> Client {
        let client = ClientImpl {
            url: self.url,
            cache: self.cache.unwrap_or_else(InMemoryCache::new)
        };

        Client(Arc::new(client))
    }
}

use crate::cache::{Cache, InMemoryCache};
use std::sync::Arc;

mod builder;
mod r#impl;

pub use builder::ClientBuilder;
pub use r#impl::ClientImpl;

/// Anything a [`ClientProvider`](../struct.ClientProvider.html) can hand out: a cheaply
/// cloneable handle to a client that owns a restorable cache.
///
/// Clones must refer to the same underlying client, `same_client` is how callers tell two
/// handles apart.
pub trait CacheClient: Clone + Send + Sync + 'static {
    type Cache: Cache + ?Sized;

    fn cache(&self) -> &Self::Cache;

    fn same_client(&self, other: &Self) -> bool;
}

#[derive(Clone)]
#[repr(transparent)]
pub struct Client(pub Arc<ClientImpl>);

impl Client {
    pub fn builder<U: Into<String>>(url: U) -> ClientBuilder {
        ClientBuilder::new(url)
    }

    pub fn url(&self) -> &str {
        &self.0.url
    }

    pub fn cache(&self) -> &InMemoryCache {
        &self.0.cache
    }

    pub fn ptr_eq(&self, other: &Client) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl CacheClient for Client {
    type Cache = InMemoryCache;

    fn cache(&self) -> &InMemoryCache {
        &self.0.cache
    }

    fn same_client(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

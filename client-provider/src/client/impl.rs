use crate::cache::InMemoryCache;

pub struct ClientImpl {
    pub(crate) url: String,
    pub(crate) cache: InMemoryCache
}

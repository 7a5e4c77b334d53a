//! Keeps one GraphQL client per browser session and rehydrates client caches from server
//! rendered snapshots.
//!
//! # Getting Started
//!
//! Create a [`ClientProvider`](struct.ClientProvider.html) once at startup from a factory that
//! knows how to build your client, then ask it for clients wherever you render:
//!
//! ```
//! use client_provider::{factory, Client, ClientProvider, ExecutionContext, SerializedState};
//!
//! let provider = ClientProvider::builder(factory::from_fn(|| {
//!     Ok(Client::builder("http://localhost:8080/graphql").build())
//! }))
//! .with_context(ExecutionContext::Browser)
//! .build();
//!
//! // The snapshot the server embedded into the page.
//! let state = SerializedState::from_json(r#"{ "Query": { "data": 1 } }"#).unwrap();
//!
//! let client = provider.init_client(Some(&state)).unwrap();
//! assert_eq!(client.cache().read_field("Query", "data"), Some(serde_json::json!(1)));
//!
//! // Later calls in the browser get the same client back.
//! let again = provider.init_client(None).unwrap();
//! assert!(client.ptr_eq(&again));
//! ```
//!
//! # Contexts
//!
//! On the server every render is its own request, so a provider running in
//! [`ExecutionContext::Server`](enum.ExecutionContext.html) hands out a new client for each call
//! and keeps nothing. After rendering, extract the cache with
//! [`Cache::extract`](trait.Cache.html#tymethod.extract) and embed it into the page.
//!
//! In the browser the provider keeps the first client it creates and returns it from then on.
//! Snapshots passed to later calls are restored into that same client.
//!
//! The context is detected from the target by default (`wasm32` with a `window` is a browser,
//! everything else is a server) and can be set explicitly through the builder.
//!
//! # Rendering
//!
//! [`use_client`](struct.ClientProvider.html#method.use_client) wraps `init_client` in a
//! [`Memoize`](memo/trait.Memoize.html) strategy owned by the render scope, so re-rendering with
//! the same snapshot `Arc` doesn't restore it again.

#[macro_use]
extern crate serde;

pub mod cache;
pub mod client;
mod context;
mod error;
pub mod memo;
mod provider;

pub use cache::{Cache, CacheError, InMemoryCache, SerializedState};
pub use client::{CacheClient, Client, ClientBuilder};
pub use context::{ExecutionContext, ParseContextError};
pub use error::{ClientError, ClientErrorCompat};
pub use memo::{MemoCell, MemoKey, Memoize};
pub use provider::{
    factory::{self, ClientFactory},
    ClientProvider, ProviderBuilder, SlotState
};

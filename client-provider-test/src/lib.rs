//! Shared fixtures for the client-provider tests.

use client_provider::{factory, Client, ClientFactory, SerializedState};
use racetrack::{track_with, Tracker};
use std::sync::Arc;

pub const URL: &str = "http://localhost:8080/graphql";

/// Construction options understood by [`tracked_factory_with_options`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClientOptions {
    pub url: String
}

impl ClientOptions {
    pub fn new<U: Into<String>>(url: U) -> Self {
        ClientOptions { url: url.into() }
    }
}

/// Records every client a factory builds. Calls show up in the tracker as
/// `Factory::client_created` and `Factory::client_created_with`.
pub struct FactoryCalls {
    tracker: Arc<Tracker>
}

#[track_with(tracker, namespace = "Factory")]
impl FactoryCalls {
    pub fn client_created(&self) {}

    pub fn client_created_with(&self, _options: Option<Arc<ClientOptions>>) {}
}

/// A factory for plain [`Client`]s pointed at [`URL`] that reports to `tracker`.
pub fn tracked_factory(tracker: &Arc<Tracker>) -> impl ClientFactory<Client = Client, Options = ()> {
    let calls = FactoryCalls {
        tracker: tracker.clone()
    };
    factory::from_fn(move || {
        calls.client_created();
        Ok(Client::builder(URL).build())
    })
}

/// A factory that builds clients from [`ClientOptions`], falling back to [`URL`] without them.
pub fn tracked_factory_with_options(
    tracker: &Arc<Tracker>
) -> impl ClientFactory<Client = Client, Options = ClientOptions> {
    let calls = FactoryCalls {
        tracker: tracker.clone()
    };
    factory::from_fn_with_options(move |options: Option<Arc<ClientOptions>>| {
        calls.client_created_with(options.clone());
        let client = match options {
            Some(options) => Client::builder(options.url.clone()).build(),
            None => Client::builder(URL).build()
        };
        Ok(client)
    })
}

/// Parse a snapshot from a `json!` literal.
pub fn snapshot(value: serde_json::Value) -> Arc<SerializedState> {
    Arc::new(serde_json::from_value(value).expect("Invalid snapshot literal"))
}

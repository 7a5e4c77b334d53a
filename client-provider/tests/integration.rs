use client_provider::{
    Cache, ClientProvider, ExecutionContext, MemoCell, SerializedState, SlotState
};
use client_provider_test::{
    snapshot, tracked_factory, tracked_factory_with_options, ClientOptions, URL
};
use racetrack::Tracker;
use serde_json::json;
use std::sync::Arc;

#[test]
fn test_browser_singleton() {
    let tracker = Tracker::new();
    let provider = ClientProvider::builder(tracked_factory(&tracker))
        .with_context(ExecutionContext::Browser)
        .build();

    let first = provider.init_client(None).unwrap();
    let second = provider.init_client(None).unwrap();

    assert!(first.ptr_eq(&second), "Browser calls returned different clients");
    assert_eq!(first.url(), URL);
    tracker.assert_that("Factory::client_created").was_called_once();
}

#[test]
fn test_browser_restores_into_the_singleton() {
    let tracker = Tracker::new();
    let provider = ClientProvider::builder(tracked_factory(&tracker))
        .with_context(ExecutionContext::Browser)
        .build();

    let first = provider
        .init_client(Some(&*snapshot(json!({ "Query": { "data": 1 } }))))
        .unwrap();
    assert_eq!(first.cache().read_field("Query", "data"), Some(json!(1)));

    let second = provider
        .init_client(Some(&*snapshot(json!({ "Query": { "data": 2 } }))))
        .unwrap();

    assert!(first.ptr_eq(&second), "Restoring state replaced the client");
    assert_eq!(
        first.cache().read_field("Query", "data"),
        Some(json!(2)),
        "Second snapshot wasn't merged into the held client"
    );
    tracker.assert_that("Factory::client_created").was_called_once();
}

#[test]
fn test_server_creates_per_call() {
    let tracker = Tracker::new();
    let provider = ClientProvider::builder(tracked_factory(&tracker))
        .with_context(ExecutionContext::Server)
        .build();

    let first = provider.init_client(None).unwrap();
    first.cache().write_field("Query", "data", json!("request one"));
    let second = provider.init_client(None).unwrap();

    assert!(!first.ptr_eq(&second), "Server calls shared a client");
    assert!(second.cache().is_empty(), "Request data leaked between server calls");
    assert_eq!(provider.slot_state(), SlotState::Empty);
    tracker.assert_that("Factory::client_created").was_called_times(2);
}

#[test]
fn test_server_render_hydrates_browser() {
    let server_tracker = Tracker::new();
    let server = ClientProvider::builder(tracked_factory(&server_tracker))
        .with_context(ExecutionContext::Server)
        .build();

    let request_client = server.init_client(None).unwrap();
    request_client
        .cache()
        .write_field("Conference:1", "name", json!("Nextbuild 2018"));
    request_client
        .cache()
        .write_field("Query", "conference", json!("Conference:1"));
    let page_state = request_client.cache().extract().to_json().unwrap();

    let browser_tracker = Tracker::new();
    let browser = ClientProvider::builder(tracked_factory(&browser_tracker))
        .with_context(ExecutionContext::Browser)
        .build();
    let memo = MemoCell::new();
    let state = Arc::new(SerializedState::from_json(&page_state).unwrap());

    let client = browser.use_client(&memo, Some(state.clone())).unwrap();
    let rerendered = browser.use_client(&memo, Some(state)).unwrap();

    assert!(client.ptr_eq(&rerendered));
    assert!(!client.ptr_eq(&request_client));
    assert_eq!(
        client.cache().read_field("Conference:1", "name"),
        Some(json!("Nextbuild 2018"))
    );
    assert_eq!(client.cache().extract(), request_client.cache().extract());
    browser_tracker
        .assert_that("Factory::client_created")
        .was_called_once();
}

#[test]
fn test_use_client_with_options_recomputes_on_new_options() {
    let tracker = Tracker::new();
    let provider = ClientProvider::builder(tracked_factory_with_options(&tracker))
        .with_context(ExecutionContext::Server)
        .build();
    let memo = MemoCell::new();
    let state = snapshot(json!({ "Query": { "data": 1 } }));
    let options_a = Arc::new(ClientOptions::new("http://localhost:8080/a"));
    let options_b = Arc::new(ClientOptions::new("http://localhost:8080/b"));

    let first = provider
        .use_client_with_options(&memo, Some(state.clone()), Some(options_a.clone()))
        .unwrap();
    let same = provider
        .use_client_with_options(&memo, Some(state.clone()), Some(options_a))
        .unwrap();
    assert!(first.ptr_eq(&same));
    tracker
        .assert_that("Factory::client_created_with")
        .was_called_once();

    let second = provider
        .use_client_with_options(&memo, Some(state), Some(options_b))
        .unwrap();

    assert!(!first.ptr_eq(&second), "Changed options didn't recompute");
    assert_eq!(first.url(), "http://localhost:8080/a");
    assert_eq!(second.url(), "http://localhost:8080/b");
    assert_eq!(second.cache().read_field("Query", "data"), Some(json!(1)));
    tracker
        .assert_that("Factory::client_created_with")
        .was_called_times(2);
}

#[test]
fn test_factory_without_options_uses_defaults() {
    let tracker = Tracker::new();
    let provider = ClientProvider::builder(tracked_factory_with_options(&tracker))
        .with_context(ExecutionContext::Browser)
        .build();

    let client = provider.init_client(None).unwrap();

    assert_eq!(client.url(), URL);
    tracker
        .assert_that("Factory::client_created_with")
        .was_called_once()
        .with(None::<Arc<ClientOptions>>);
}

#[test]
fn test_shared_provider_across_threads() {
    let tracker = Tracker::new();
    let provider = Arc::new(
        ClientProvider::builder(tracked_factory(&tracker))
            .with_context(ExecutionContext::Browser)
            .build()
    );

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let provider = provider.clone();
            std::thread::spawn(move || {
                let state = SerializedState::new().with_field("Query", format!("field{}", i), json!(i));
                provider.init_client(Some(&state)).unwrap()
            })
        })
        .collect();
    let clients: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    assert!(clients.windows(2).all(|pair| pair[0].ptr_eq(&pair[1])));
    assert_eq!(
        clients[0].cache().read_entity("Query").map(|fields| fields.len()),
        Some(8)
    );
    tracker.assert_that("Factory::client_created").was_called_once();
}

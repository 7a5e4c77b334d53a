//! Simulates a server render followed by browser hydration.
//!
//! `GRAPHQL_URL` sets the endpoint the clients are built for. `PROVIDER_CONTEXT` picks which side
//! of the page load to run: `server` renders and prints the page state to stdout, `browser` reads
//! a page state from stdin and hydrates it. Both sides run in one process when it's unset, so
//! `PROVIDER_CONTEXT=server demo | PROVIDER_CONTEXT=browser demo` is the split version of a plain
//! `demo`. Log output is controlled with `RUST_LOG`.

use client_provider::{
    factory, Cache, Client, ClientError, ClientFactory, ClientProvider, ExecutionContext,
    MemoCell, SerializedState
};
use serde_json::json;
use std::{
    env,
    error::Error,
    io::{self, Read, Write},
    sync::Arc
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "http://localhost:8080/graphql";

fn client_factory(url: String) -> impl ClientFactory<Client = Client, Options = ()> {
    factory::from_fn(move || Ok(Client::builder(url.clone()).build()))
}

/// Renders two requests and returns the page state embedded by the last one.
fn render_on_server(url: String) -> Result<String, ClientError> {
    let provider = ClientProvider::builder(client_factory(url))
        .with_context(ExecutionContext::Server)
        .build();

    let mut page_state = String::new();
    for (id, name) in [("1", "Nextbuild 2018"), ("2", "RustFest 2019")].iter() {
        let client = provider.init_client(None)?;
        let key = format!("Conference:{}", id);
        client.cache().write_field(key.as_str(), "id", json!(id));
        client.cache().write_field(key.as_str(), "name", json!(name));
        client.cache().write_field("Query", "conference", json!(key));

        page_state = client.cache().extract().to_json()?;
        info!(request = *id, bytes = page_state.len(), "rendered page");
    }

    Ok(page_state)
}

fn hydrate_in_browser(url: String, page_state: &str) -> Result<(), ClientError> {
    let provider = ClientProvider::builder(client_factory(url))
        .with_context(ExecutionContext::Browser)
        .build();
    let memo = MemoCell::new();
    let state = Arc::new(SerializedState::from_json(page_state)?);

    // Three renders of the same page state only restore it once.
    for render in 0..3 {
        let client = provider.use_client(&memo, Some(state.clone()))?;
        let conference = client
            .cache()
            .read_field("Query", "conference")
            .and_then(|key| key.as_str().map(str::to_string))
            .and_then(|key| client.cache().read_field(&key, "name"));
        info!(render, url = client.url(), ?conference, "rendered in browser");
    }

    let updated = SerializedState::new().with_field("Query", "viewer", json!("User:1"));
    let client = provider.init_client(Some(&updated))?;
    info!(
        entities = client.cache().len(),
        slot = ?provider.slot_state(),
        "merged client-side update"
    );

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let url = env::var("GRAPHQL_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());
    let context = match env::var("PROVIDER_CONTEXT") {
        Ok(context) => Some(context.parse::<ExecutionContext>()?),
        Err(_) => None
    };

    run(context, url, io::stdin(), io::stdout())
}

fn run<R: Read, W: Write>(
    context: Option<ExecutionContext>,
    url: String,
    mut input: R,
    mut output: W
) -> Result<(), Box<dyn Error>> {
    match context {
        Some(ExecutionContext::Server) => {
            let page_state = render_on_server(url).map_err(ClientError::compat)?;
            writeln!(output, "{}", page_state)?;
        }
        Some(ExecutionContext::Browser) => {
            let mut page_state = String::new();
            input.read_to_string(&mut page_state)?;
            hydrate_in_browser(url, page_state.trim()).map_err(ClientError::compat)?;
        }
        None => {
            let page_state = render_on_server(url.clone()).map_err(ClientError::compat)?;
            hydrate_in_browser(url, &page_state).map_err(ClientError::compat)?;
        }
    }

    Ok(())
}

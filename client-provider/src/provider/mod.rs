use crate::{
    cache::{Cache, SerializedState},
    client::CacheClient,
    memo::Memoize,
    ClientError, ExecutionContext
};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, trace};

pub mod factory;


use factory::ClientFactory;

/// Whether a provider is holding on to a client yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Empty,
    /// Terminal: once populated the slot is never cleared or replaced.
    Populated
}

pub struct ProviderBuilder<F: ClientFactory> {
    factory: F,
    context: Option<ExecutionContext>
}

impl<F: ClientFactory> ProviderBuilder<F> {
    pub fn new(factory: F) -> Self {
        ProviderBuilder {
            factory,
            context: None
        }
    }

    /// Set the execution context explicitly. Defaults to [`ExecutionContext::detect`].
    ///
    /// [`ExecutionContext::detect`]: enum.ExecutionContext.html#method.detect
    pub fn with_context(mut self, context: ExecutionContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn build(self) -> ClientProvider<F> {
        let context = self.context.unwrap_or_else(ExecutionContext::detect);
        debug!(%context, "client provider created");

        ClientProvider {
            factory: self.factory,
            context,
            client: Mutex::new(None)
        }
    }
}

/// Hands out GraphQL clients to rendering code and rehydrates their caches.
///
/// In a [`Browser`] context the first client created is kept for the lifetime of the provider
/// and every later call gets that same client back. In a [`Server`] context nothing is kept:
/// each call asks the factory for a new client, unless the provider already holds one from an
/// earlier browser-context call.
///
/// Create one provider at startup and share it (by reference or `Arc`) with everything that
/// renders.
///
/// [`Browser`]: enum.ExecutionContext.html#variant.Browser
/// [`Server`]: enum.ExecutionContext.html#variant.Server
pub struct ClientProvider<F: ClientFactory> {
    factory: F,
    context: ExecutionContext,
    client: Mutex<Option<F::Client>>
}

impl<F: ClientFactory> ClientProvider<F> {
    /// A provider for the detected execution context.
    pub fn new(factory: F) -> Self {
        ProviderBuilder::new(factory).build()
    }

    pub fn builder(factory: F) -> ProviderBuilder<F> {
        ProviderBuilder::new(factory)
    }

    pub fn context(&self) -> ExecutionContext {
        self.context
    }

    pub fn slot_state(&self) -> SlotState {
        if self.client.lock().is_some() {
            SlotState::Populated
        } else {
            SlotState::Empty
        }
    }

    /// The client held for the browser context, if one has been created yet.
    pub fn cached_client(&self) -> Option<F::Client> {
        self.client.lock().clone()
    }

    /// Get a client, restoring `state` into its cache.
    ///
    /// `state` is written into whichever client is returned, including the shared browser
    /// client, so data restored here is visible to every other holder of that client.
    /// An empty snapshot is the same as no snapshot.
    ///
    /// Errors from the factory or from the cache restore are returned as-is. If the restore
    /// fails the client is not kept.
    pub fn init_client(&self, state: Option<&SerializedState>) -> Result<F::Client, ClientError> {
        self.init_client_with_options(state, None)
    }

    /// Like [`init_client`](#method.init_client), forwarding `options` to the factory when a new
    /// client has to be created. Options are ignored when a client is already held.
    pub fn init_client_with_options(
        &self,
        state: Option<&SerializedState>,
        options: Option<Arc<F::Options>>
    ) -> Result<F::Client, ClientError> {
        self.init_client_in_context(self.context, state, options)
    }

    /// Initialize as if running in `context` instead of the provider's own context.
    ///
    /// A server-context call still returns the held client if an earlier browser-context call
    /// left one behind.
    pub fn init_client_in_context(
        &self,
        context: ExecutionContext,
        state: Option<&SerializedState>,
        options: Option<Arc<F::Options>>
    ) -> Result<F::Client, ClientError> {
        let held = self.client.lock().clone();
        if let Some(client) = held {
            trace!(%context, "reusing held client");
            self.restore(&client, state)?;
            return Ok(client);
        }

        if context.is_server() {
            let client = self.create(context, options)?;
            self.restore(&client, state)?;
            return Ok(client);
        }

        // Locked through creation so concurrent first calls can't create two browser clients.
        let mut slot = self.client.lock();
        if let Some(client) = slot.clone() {
            trace!("client was created by a concurrent call");
            self.restore(&client, state)?;
            return Ok(client);
        }

        let client = self.create(context, options)?;
        self.restore(&client, state)?;
        debug!("holding client for the browser context");
        *slot = Some(client.clone());

        Ok(client)
    }

    fn create(
        &self,
        context: ExecutionContext,
        options: Option<Arc<F::Options>>
    ) -> Result<F::Client, ClientError> {
        debug!(%context, with_options = options.is_some(), "creating client");
        self.factory.create(options)
    }

    fn restore(&self, client: &F::Client, state: Option<&SerializedState>) -> Result<(), ClientError> {
        if let Some(state) = state.filter(|state| !state.is_empty()) {
            debug!(entities = state.len(), "restoring cache state");
            client.cache().restore(state.clone())?;
        }
        Ok(())
    }

    /// Render-scope accessor around [`init_client`](#method.init_client).
    ///
    /// `memo` belongs to the calling render scope. The client is only re-initialized when `state`
    /// is not the same `Arc` (or `None` both times) as on the previous call through `memo`.
    pub fn use_client<M>(
        &self,
        memo: &M,
        state: Option<Arc<SerializedState>>
    ) -> Result<F::Client, ClientError>
    where
        M: Memoize<Option<Arc<SerializedState>>, F::Client>
    {
        let key = state.clone();
        memo.memoize(key, || self.init_client(state.as_deref()))
    }

    /// Render-scope accessor around
    /// [`init_client_with_options`](#method.init_client_with_options). The memoization key is the
    /// pair of `state` and `options`, so a new options `Arc` re-initializes even when `state` is
    /// unchanged.
    pub fn use_client_with_options<M>(
        &self,
        memo: &M,
        state: Option<Arc<SerializedState>>,
        options: Option<Arc<F::Options>>
    ) -> Result<F::Client, ClientError>
    where
        M: Memoize<(Option<Arc<SerializedState>>, Option<Arc<F::Options>>), F::Client>
    {
        let key = (state.clone(), options.clone());
        memo.memoize(key, || {
            self.init_client_with_options(state.as_deref(), options)
        })
    }
}

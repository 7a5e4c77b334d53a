use crate::{client::CacheClient, ClientError};
use std::{marker::PhantomData, sync::Arc};

/// Builds the clients a provider hands out.
///
/// `Options` is whatever construction options the application wants to pass through. They
/// are forwarded untouched, wrapped in an `Arc` so that render-scope memoization can compare
/// them by identity. Factories that take no options use `()`.
pub trait ClientFactory: Send + Sync {
    type Client: CacheClient;
    type Options: Send + Sync + 'static;

    fn create(&self, options: Option<Arc<Self::Options>>) -> Result<Self::Client, ClientError>;
}

/// A factory built from a closure that takes no options. See [`from_fn`](fn.from_fn.html).
pub struct FnFactory<F>(F);

/// A factory built from a closure that receives the construction options.
/// See [`from_fn_with_options`](fn.from_fn_with_options.html).
pub struct FnFactoryWithOptions<F, O> {
    create: F,
    options: PhantomData<fn(O)>
}

/// Use a closure as a factory. Options passed to the provider are ignored.
///
/// ```
/// use client_provider::{factory, Client, ClientProvider, ExecutionContext};
///
/// let provider = ClientProvider::builder(factory::from_fn(|| {
///     Ok(Client::builder("http://localhost:8080/graphql").build())
/// }))
/// .with_context(ExecutionContext::Browser)
/// .build();
///
/// let first = provider.init_client(None).unwrap();
/// let second = provider.init_client(None).unwrap();
/// assert!(first.ptr_eq(&second));
/// ```
pub fn from_fn<F, C>(create: F) -> FnFactory<F>
where
    F: Fn() -> Result<C, ClientError> + Send + Sync,
    C: CacheClient
{
    FnFactory(create)
}

/// Use a closure receiving the construction options as a factory.
pub fn from_fn_with_options<F, C, O>(create: F) -> FnFactoryWithOptions<F, O>
where
    F: Fn(Option<Arc<O>>) -> Result<C, ClientError> + Send + Sync,
    C: CacheClient,
    O: Send + Sync + 'static
{
    FnFactoryWithOptions {
        create,
        options: PhantomData
    }
}

impl<F, C> ClientFactory for FnFactory<F>
where
    F: Fn() -> Result<C, ClientError> + Send + Sync,
    C: CacheClient
{
    type Client = C;
    type Options = ();

    fn create(&self, _options: Option<Arc<()>>) -> Result<C, ClientError> {
        (self.0)()
    }
}

impl<F, C, O> ClientFactory for FnFactoryWithOptions<F, O>
where
    F: Fn(Option<Arc<O>>) -> Result<C, ClientError> + Send + Sync,
    C: CacheClient,
    O: Send + Sync + 'static
{
    type Client = C;
    type Options = O;

    fn create(&self, options: Option<Arc<O>>) -> Result<C, ClientError> {
        (self.create)(options)
    }
}

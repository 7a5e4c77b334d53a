use std::{any::Any, error::Error, fmt, sync::Arc};

/// An opaque error raised by a client factory or while restoring a cache snapshot.
///
/// The provider never inspects or recovers from these, it only passes them on.
/// The original error is still reachable through [`downcast_ref`](#method.downcast_ref).
#[derive(Clone, Debug)]
pub struct ClientError {
    inner: Arc<Box<dyn Error + Send + Sync>>
}

#[derive(Debug)]
pub struct ClientErrorCompat(ClientError);

impl Error for ClientErrorCompat {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.0.as_error())
    }
}

impl fmt::Display for ClientErrorCompat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ClientError {
    pub fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.inner.source()
    }

    /// Returns the wrapped error if it is of type `T`.
    pub fn downcast_ref<T: Error + 'static>(&self) -> Option<&T> {
        let inner: &(dyn Error + 'static) = self.as_error();
        inner.downcast_ref::<T>()
    }

    pub fn is<T: Error + Any>(&self) -> bool {
        self.downcast_ref::<T>().is_some()
    }

    /// Turns this into something that implements `std::error::Error`, for use with `?` in
    /// functions returning `Box<dyn Error>`.
    pub fn compat(self) -> ClientErrorCompat {
        ClientErrorCompat(self)
    }

    fn as_error(&self) -> &(dyn Error + Send + Sync + 'static) {
        &**self.inner
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl<T: Error + Send + Sync + 'static> From<T> for ClientError {
    fn from(e: T) -> Self {
        ClientError {
            inner: Arc::new(Box::new(e))
        }
    }
}

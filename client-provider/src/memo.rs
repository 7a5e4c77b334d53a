//! Render-scope memoization.
//!
//! A UI layer re-renders far more often than its inputs change. [`Memoize`] lets the provider's
//! `use_client` skip re-initialization when it is called again with the very same inputs, where
//! "the same" means reference identity ([`MemoKey`]), not structural equality.

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::trace;

/// Identity comparison for memoization keys.
pub trait MemoKey {
    fn same_key(&self, other: &Self) -> bool;
}

impl<T: ?Sized> MemoKey for Arc<T> {
    fn same_key(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

impl<K: MemoKey> MemoKey for Option<K> {
    fn same_key(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.same_key(b),
            (None, None) => true,
            _ => false
        }
    }
}

impl<A: MemoKey, B: MemoKey> MemoKey for (A, B) {
    fn same_key(&self, other: &Self) -> bool {
        self.0.same_key(&other.0) && self.1.same_key(&other.1)
    }
}

impl MemoKey for () {
    fn same_key(&self, _other: &Self) -> bool {
        true
    }
}

/// A memoization strategy: only run `compute` when `key` differs from the key of the value
/// currently held.
///
/// Failed computations are not remembered, the next call with any key runs `compute` again.
pub trait Memoize<K, V> {
    fn memoize<E, F>(&self, key: K, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>;
}

/// The default strategy, one cell per render scope holding the last key and value.
pub struct MemoCell<K, V> {
    inner: Mutex<Option<(K, V)>>
}

impl<K, V> MemoCell<K, V> {
    pub fn new() -> Self {
        MemoCell {
            inner: Mutex::new(None)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_none()
    }

    /// Forget the held value, e.g. when the owning component unmounts.
    pub fn clear(&self) {
        *self.inner.lock() = None;
    }
}

impl<K, V> Default for MemoCell<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: MemoKey, V: Clone> Memoize<K, V> for MemoCell<K, V> {
    fn memoize<E, F>(&self, key: K, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>
    {
        let mut cell = self.inner.lock();
        if let Some((held_key, value)) = cell.as_ref() {
            if held_key.same_key(&key) {
                trace!("memoized value reused");
                return Ok(value.clone());
            }
        }

        trace!("memo key changed, recomputing");
        let value = compute()?;
        *cell = Some((key, value.clone()));
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoCell, MemoKey, Memoize};
    use std::{cell::Cell, sync::Arc};

    #[test]
    fn arcs_compare_by_identity() {
        let a = Arc::new(String::from("state"));
        let b = Arc::new(String::from("state"));

        assert!(a.same_key(&a.clone()));
        assert!(!a.same_key(&b), "Equal but distinct values must not share a key");
    }

    #[test]
    fn options_and_pairs_compare_component_wise() {
        let state = Arc::new(1);
        let options = Arc::new("opts");

        assert!(None::<Arc<i32>>.same_key(&None));
        assert!(!Some(state.clone()).same_key(&None));
        assert!((Some(state.clone()), Some(options.clone()))
            .same_key(&(Some(state.clone()), Some(options.clone()))));
        assert!(!(Some(state.clone()), Some(options))
            .same_key(&(Some(state), Some(Arc::new("opts")))));
    }

    #[test]
    fn recomputes_only_when_the_key_changes() {
        let cell = MemoCell::new();
        let runs = Cell::new(0);
        let compute = || -> Result<u32, ()> {
            runs.set(runs.get() + 1);
            Ok(runs.get())
        };

        let first = Arc::new(());
        let second = Arc::new(());

        assert!(cell.is_empty());
        assert_eq!(cell.memoize(first.clone(), compute), Ok(1));
        assert_eq!(cell.memoize(first.clone(), compute), Ok(1));
        assert_eq!(cell.memoize(second.clone(), compute), Ok(2));
        assert_eq!(cell.memoize(first, compute), Ok(3));
        assert_eq!(runs.get(), 3);
        assert!(!cell.is_empty());
    }

    #[test]
    fn errors_are_not_memoized() {
        let cell = MemoCell::<(), u32>::new();
        let runs = Cell::new(0);

        let failed: Result<u32, &str> = cell.memoize((), || {
            runs.set(runs.get() + 1);
            Err("factory failed")
        });
        assert_eq!(failed, Err("factory failed"));
        assert!(cell.is_empty());

        let recovered: Result<u32, &str> = cell.memoize((), || {
            runs.set(runs.get() + 1);
            Ok(7)
        });
        assert_eq!(recovered, Ok(7));
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn clear_forgets_the_value() {
        let cell = MemoCell::new();
        let key = Arc::new(());

        assert_eq!(cell.memoize(key.clone(), || Ok::<_, ()>(1)), Ok(1));
        cell.clear();
        assert_eq!(cell.memoize(key, || Ok::<_, ()>(2)), Ok(2));
    }
}

use crate::error::Error;
use crate::model::Snapshot;
use crate::selector::Selector;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A [`Selector`] shared between threads behind a single lock.
///
/// Every call holds the lock for its whole duration, so the trim, candidate scan and
/// append of [`SharedSelector::pick_next`] are observed atomically. Reset listeners run
/// while the lock is held and must not call back into the same `SharedSelector`.
pub struct SharedSelector<K, T> {
    inner: Arc<Mutex<Selector<K, T>>>,
}

impl<K, T> SharedSelector<K, T>
where
    K: Clone + Eq + Hash + Debug,
    T: Clone + Eq + Hash + Debug,
{
    pub fn new(selector: Selector<K, T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(selector)),
        }
    }

    // Operations never leave a half-applied state behind, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Selector<K, T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn pick_next(&self, key: &K) -> Result<T, Error> {
        self.lock().pick_next(key)
    }

    /// Run `f` with exclusive access to the underlying Selector
    pub fn with<R>(&self, f: impl FnOnce(&mut Selector<K, T>) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn snapshot(&self) -> Snapshot<K, T> {
        self.lock().snapshot()
    }
}

impl<K, T> Clone for SharedSelector<K, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

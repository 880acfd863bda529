//! Shared, observable state for the async table variants.

use std::sync::Arc;
use std::sync::RwLock;

use tokio::sync::watch;

/// Thread-safe state with a revision counter.
///
/// `SharedState<T>` wraps `Arc<RwLock<T>>` and bumps a `watch` revision on
/// every update so observers can wait for changes. Guards are never held
/// across an `.await`.
#[derive(Debug)]
pub(crate) struct SharedState<T> {
    inner: Arc<RwLock<T>>,
    revision: Arc<watch::Sender<u64>>,
}

impl<T> SharedState<T> {
    /// Create a new state with the given value
    pub fn new(value: T) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(RwLock::new(value)),
            revision: Arc::new(revision),
        }
    }

    /// Read the value through a closure
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        match self.inner.read() {
            Ok(guard) => f(&guard),
            Err(poisoned) => f(&poisoned.into_inner()),
        }
    }

    /// Update the value through a closure and bump the revision
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let result = match self.inner.write() {
            Ok(mut guard) => f(&mut guard),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        };
        self.revision.send_modify(|rev| *rev += 1);
        result
    }

    /// Subscribe to revision changes
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }
}

impl<T> Clone for SharedState<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            revision: Arc::clone(&self.revision),
        }
    }
}

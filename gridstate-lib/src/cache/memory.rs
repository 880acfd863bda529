//! In-memory page cache using DashMap

use async_trait::async_trait;
use dashmap::DashMap;

use super::CachedPage;
use super::PageCache;

/// An in-memory page cache backed by a concurrent hash map.
///
/// Unbounded in size; entries leave on expiry, `gc()` or `clear()`.
///
/// # Example
///
/// ```
/// use gridstate_lib::cache::InMemoryPageCache;
///
/// let cache = InMemoryPageCache::new();
/// assert!(cache.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryPageCache {
    store: DashMap<String, CachedPage>,
}

impl InMemoryPageCache {
    /// Creates a new empty cache.
    pub fn new() -> Self {
        Self {
            store: DashMap::new(),
        }
    }

    /// Returns the number of entries in the cache (including expired ones).
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

#[async_trait]
impl PageCache for InMemoryPageCache {
    async fn get(&self, key: &str) -> Option<CachedPage> {
        self.store.remove_if(key, |_, page| page.is_expired());
        self.store.get(key).map(|entry| entry.value().clone())
    }

    async fn set(&self, key: &str, value: CachedPage) {
        self.store.insert(key.to_owned(), value);
    }

    async fn clear(&self) {
        self.store.clear();
    }

    async fn gc(&self) -> usize {
        let before = self.store.len();
        self.store.retain(|_, page| !page.is_expired());
        before.saturating_sub(self.store.len())
    }
}

//! Page cache for the remote-driven table.
//!
//! Provides a `PageCache` trait and implementations for memoizing remote
//! page responses keyed by their canonical request parameters.
//!
//! Eviction policy: every entry carries a TTL (see [`CacheConfig`]); expired
//! entries are never returned and are dropped on read or by `gc()`, which the
//! remote table runs before every store. A manual
//! refresh (`RemoteTable::refetch`) clears the whole cache. Failed fetches
//! are never cached.

mod config;
mod memory;

pub use config::*;
pub use memory::*;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::remote::RemotePage;

/// A cached page with metadata about when it was cached and when it expires.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedPage {
    /// The cached response.
    pub page: RemotePage,
    /// When this page was cached.
    pub created_at: DateTime<Utc>,
    /// When this page expires and should no longer be returned.
    pub expires_at: DateTime<Utc>,
}

impl CachedPage {
    /// Creates a new cached page with a TTL from now.
    pub fn with_ttl(page: RemotePage, ttl: std::time::Duration) -> Self {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::zero());
        Self {
            page,
            created_at: now,
            expires_at,
        }
    }

    /// Returns `true` if this cached page has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Trait for page cache providers.
///
/// Implementations store and retrieve pages by canonical request keys
/// (see `PageRequest::cache_key`). `get()` never returns an expired page.
/// The remote table calls `gc()` before storing each new page and `clear()`
/// on refetch.
///
/// # Example
///
/// ```ignore
/// use gridstate_lib::cache::{CachedPage, InMemoryPageCache, PageCache};
/// use std::time::Duration;
///
/// let cache = InMemoryPageCache::new();
/// cache.set(&request.cache_key(), CachedPage::with_ttl(page, Duration::from_secs(60))).await;
///
/// if let Some(cached) = cache.get(&request.cache_key()).await {
///     println!("{} rows", cached.page.rows.len());
/// }
/// ```
#[async_trait]
pub trait PageCache: Send + Sync {
    /// Retrieves a cached page by key.
    ///
    /// Returns `None` if the key doesn't exist or the page has expired.
    async fn get(&self, key: &str) -> Option<CachedPage>;

    /// Stores a page in the cache.
    async fn set(&self, key: &str, value: CachedPage);

    /// Clears all pages from the cache.
    async fn clear(&self);

    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    async fn gc(&self) -> usize;
}

/// A cache that never stores anything.
///
/// The default for remote tables: every request goes to the fetcher.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCache;

#[async_trait]
impl PageCache for NoCache {
    async fn get(&self, _key: &str) -> Option<CachedPage> {
        None
    }

    async fn set(&self, _key: &str, _value: CachedPage) {}

    async fn clear(&self) {}

    async fn gc(&self) -> usize {
        0
    }
}

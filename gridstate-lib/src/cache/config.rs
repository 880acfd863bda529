//! Cache configuration

use std::time::Duration;

/// Configuration for page cache TTL settings.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use gridstate_lib::cache::CacheConfig;
///
/// let config = CacheConfig::default().with_page_ttl(Duration::from_secs(60));
/// assert!(config.is_enabled());
/// assert!(!CacheConfig::no_cache().is_enabled());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// TTL for cached pages.
    ///
    /// Default: 5 minutes
    pub page_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            page_ttl: Duration::from_secs(300), // 5 minutes
        }
    }
}

impl CacheConfig {
    /// Creates a new cache config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page TTL.
    pub fn with_page_ttl(mut self, ttl: Duration) -> Self {
        self.page_ttl = ttl;
        self
    }

    /// Creates a config with no caching (zero TTL).
    pub fn no_cache() -> Self {
        Self {
            page_ttl: Duration::ZERO,
        }
    }

    /// Returns `true` if pages are kept for any time at all.
    pub fn is_enabled(&self) -> bool {
        !self.page_ttl.is_zero()
    }
}

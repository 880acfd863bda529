//! Remote table configuration

use std::time::Duration;

/// Default delay between the last keystroke and the search fetch.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Settings for a [`RemoteTable`](super::RemoteTable).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use gridstate_lib::remote::RemoteConfig;
///
/// let config = RemoteConfig::default().search_debounce(Duration::from_millis(150));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteConfig {
    /// How long a search query must stay unchanged before it is fetched.
    ///
    /// Default: 300 ms
    pub search_debounce: Duration,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
        }
    }
}

impl RemoteConfig {
    /// Sets the search debounce delay.
    pub fn search_debounce(mut self, delay: Duration) -> Self {
        self.search_debounce = delay;
        self
    }
}

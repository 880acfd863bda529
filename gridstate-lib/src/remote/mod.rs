//! Remote-driven table.
//!
//! A [`RemoteTable`] keeps its table in server mode: the raw rows are always
//! exactly the page the data source returned, and `pagination.total` is the
//! total the data source reported. Every state-changing action updates the
//! local state at once and then fetches the page for the new parameters.
//!
//! - Sort, page and page size changes fetch immediately.
//! - Search changes are debounced (300 ms by default). A later action before
//!   the timer fires supersedes the pending search without it being issued.
//! - `refetch()` reloads the current view and raises `is_refetching`.
//! - Every fetch carries a request id. A response whose id is no longer the
//!   latest is dropped, so a slow stale response never overwrites a newer one.
//! - A failed fetch clears the rows and sets `error`. There is no automatic
//!   retry.
//!
//! All methods that spawn tasks must be called inside a tokio runtime.
//!
//! # Example
//!
//! ```ignore
//! use gridstate_lib::remote::{PageRequest, RemotePage, RemoteTable};
//!
//! let table = RemoteTable::new(config, |request: PageRequest| async move {
//!     api.users(request.offset(), request.page_size).await
//! })?;
//!
//! table.mount();
//! table.set_page(2);
//! table.wait_idle().await;
//! render(table.snapshot());
//! ```

mod config;
mod request;

pub use config::*;
pub use request::*;

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use tokio::sync::watch;
use tokio::task::AbortHandle;

use crate::cache::CacheConfig;
use crate::cache::CachedPage;
use crate::cache::NoCache;
use crate::cache::PageCache;
use crate::error::AsyncOutcome;
use crate::error::ConfigError;
use crate::error::FetchError;
use crate::fetch::FetchTicket;
use crate::fetch::RequestGuard;
use crate::fetch::RequestId;
use crate::model::Row;
use crate::pipeline::PaginationInfo;
use crate::pipeline::SortSpec;
use crate::state::SharedState;
use crate::table::DataMode;
use crate::table::Table;
use crate::table::TableConfig;
use crate::table::TableSnapshot;

/// Why a fetch was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchKind {
    /// Mount, navigation, sort or search.
    Navigate,
    /// Manual refresh of the current view.
    Refetch,
}

#[derive(Debug)]
struct RemoteState {
    table: Table,
    error: Option<FetchError>,
    is_refetching: bool,
    /// A debounced search is waiting for its timer.
    search_pending: bool,
    requests: RequestGuard,
}

impl RemoteState {
    fn request(&self) -> PageRequest {
        let table = &self.table;
        PageRequest {
            page: table.page(),
            page_size: table.page_size(),
            sort: if table.sorting_enabled() {
                table.sort().cloned()
            } else {
                None
            },
            search_query: if table.filtering_enabled() {
                table.search_query().to_string()
            } else {
                String::new()
            },
        }
    }

    /// Marks a fetch in flight and returns its id and parameters.
    fn begin(&mut self, kind: FetchKind) -> (RequestId, PageRequest) {
        let id = self.requests.issue();
        self.search_pending = false;
        match kind {
            FetchKind::Navigate => self.table.set_loading(true),
            FetchKind::Refetch => self.is_refetching = true,
        }
        (id, self.request())
    }
}

struct RemoteInner<F> {
    fetcher: F,
    cache: Arc<dyn PageCache>,
    cache_config: CacheConfig,
    config: RemoteConfig,
    state: SharedState<RemoteState>,
    mounted: AtomicBool,
    debounce: Mutex<Option<AbortHandle>>,
}

/// A table whose every interaction is served by a remote data source.
///
/// Cheap to clone; clones share the same state.
pub struct RemoteTable<F> {
    inner: Arc<RemoteInner<F>>,
}

impl<F> Clone for RemoteTable<F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<F: PageFetcher> RemoteTable<F> {
    /// Creates a remote table with the default [`RemoteConfig`] and no cache.
    ///
    /// The config's `data` is ignored and its mode forced to
    /// [`DataMode::Server`]. Nothing is fetched until [`mount`](Self::mount).
    pub fn new(config: TableConfig, fetcher: F) -> Result<Self, ConfigError> {
        Self::with_config(config, RemoteConfig::default(), fetcher)
    }

    /// Creates a remote table with explicit remote settings.
    pub fn with_config(
        config: TableConfig,
        remote: RemoteConfig,
        fetcher: F,
    ) -> Result<Self, ConfigError> {
        let table = Table::new(config.data(Vec::new()).mode(DataMode::Server))?;
        Ok(Self {
            inner: Arc::new(RemoteInner {
                fetcher,
                cache: Arc::new(NoCache),
                cache_config: CacheConfig::no_cache(),
                config: remote,
                state: SharedState::new(RemoteState {
                    table,
                    error: None,
                    is_refetching: false,
                    search_pending: false,
                    requests: RequestGuard::default(),
                }),
                mounted: AtomicBool::new(false),
                debounce: Mutex::new(None),
            }),
        })
    }

    /// Installs a page cache.
    ///
    /// Must be called before the table is cloned or mounted.
    pub fn with_cache(mut self, cache: Arc<dyn PageCache>, cache_config: CacheConfig) -> Self {
        match Arc::get_mut(&mut self.inner) {
            Some(inner) => {
                inner.cache = cache;
                inner.cache_config = cache_config;
            }
            None => log::warn!("remote table already shared, cache not installed"),
        }
        self
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Issues the initial fetch. Only the first call does anything, and none
    /// does after a [`refetch`](Self::refetch).
    pub fn mount(&self) -> Option<FetchTicket> {
        if self.inner.mounted.swap(true, Ordering::SeqCst) {
            return None;
        }
        log::debug!("remote table mounted");
        Some(self.navigate(|_| {}))
    }

    /// Replaces the sort, returns to page 1 and fetches.
    pub fn set_sort(&self, sort: Option<SortSpec>) -> FetchTicket {
        self.navigate(|table| table.set_sort(sort))
    }

    /// Advances the header-click sort cycle for `key` and fetches.
    pub fn toggle_sort(&self, key: &str) -> FetchTicket {
        self.navigate(|table| table.toggle_sort(key))
    }

    /// Moves to `page` (clamped against the last reported total) and fetches.
    pub fn set_page(&self, page: i64) -> FetchTicket {
        self.navigate(|table| table.set_page(page))
    }

    /// Replaces the page size, returns to page 1 and fetches.
    pub fn set_page_size(&self, page_size: usize) -> FetchTicket {
        self.navigate(|table| table.set_page_size(page_size))
    }

    /// Replaces the search query now and fetches once it settles.
    ///
    /// The returned ticket resolves when the debounced fetch settled, or as
    /// soon as a later action supersedes it. With filtering disabled the
    /// query is only recorded: the page is kept and `None` is returned.
    pub fn set_search_query(&self, query: impl Into<String>) -> Option<FetchTicket> {
        let query = query.into();
        let id = self.inner.state.update(|s| {
            if !s.table.filtering_enabled() {
                s.table.record_search_query(query);
                return None;
            }
            s.table.set_search_query(query);
            s.search_pending = true;
            Some(s.requests.issue())
        })?;

        let inner = Arc::clone(&self.inner);
        let delay = self.inner.config.search_debounce;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let issued = inner.state.update(|s| {
                if s.requests.is_current(id) {
                    Some(s.begin(FetchKind::Navigate))
                } else {
                    None
                }
            });
            match issued {
                Some((id, request)) => inner.run(id, request, FetchKind::Navigate).await,
                None => log::debug!("search fetch #{} superseded before issue", id),
            }
        });

        let ticket = FetchTicket::new(id, handle);
        self.replace_debounce(Some(ticket.abort_handle()));
        Some(ticket)
    }

    /// Reloads the current view without changing any parameter.
    ///
    /// Raises `is_refetching` instead of `loading`, bypasses the page cache
    /// and clears it. Counts as mounting: a later [`mount`](Self::mount) does
    /// nothing and [`reset`](Self::reset) fetches again.
    pub fn refetch(&self) -> FetchTicket {
        self.inner.mounted.store(true, Ordering::SeqCst);
        self.replace_debounce(None);
        let (id, request) = self.inner.state.update(|s| s.begin(FetchKind::Refetch));
        self.spawn(id, request, FetchKind::Refetch)
    }

    /// Restores default sort, query, page and page size.
    ///
    /// In-flight responses are dropped. Once mounted, the default view is
    /// fetched again.
    pub fn reset(&self) -> Option<FetchTicket> {
        self.replace_debounce(None);
        self.inner.state.update(|s| {
            s.table.reset();
            s.is_refetching = false;
            s.search_pending = false;
            s.requests.issue();
        });

        if self.inner.mounted.load(Ordering::SeqCst) {
            Some(self.navigate(|_| {}))
        } else {
            None
        }
    }

    fn navigate(&self, change: impl FnOnce(&mut Table)) -> FetchTicket {
        self.replace_debounce(None);
        let (id, request) = self.inner.state.update(|s| {
            change(&mut s.table);
            s.begin(FetchKind::Navigate)
        });
        self.spawn(id, request, FetchKind::Navigate)
    }

    fn spawn(&self, id: RequestId, request: PageRequest, kind: FetchKind) -> FetchTicket {
        log::debug!("fetch #{} issued: {:?}", id, request);
        let inner = Arc::clone(&self.inner);
        FetchTicket::new(id, tokio::spawn(async move { inner.run(id, request, kind).await }))
    }

    fn replace_debounce(&self, next: Option<AbortHandle>) {
        let mut slot = match self.inner.debounce.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(previous) = slot.take() {
            previous.abort();
        }
        *slot = next;
    }

    // =========================================================================
    // Read surface
    // =========================================================================

    /// Returns an owned copy of the visible state.
    pub fn snapshot(&self) -> TableSnapshot {
        self.inner.state.read(|s| TableSnapshot {
            error: s.error.clone(),
            is_refetching: s.is_refetching,
            ..s.table.snapshot()
        })
    }

    /// Runs `f` against the underlying table.
    pub fn with_table<R>(&self, f: impl FnOnce(&Table) -> R) -> R {
        self.inner.state.read(|s| f(&s.table))
    }

    /// Returns the rows of the current page.
    pub fn page_data(&self) -> Vec<Row> {
        self.inner.state.read(|s| s.table.raw_data().to_vec())
    }

    /// Returns pagination with the remote-reported total.
    pub fn pagination(&self) -> Option<PaginationInfo> {
        self.with_table(Table::pagination)
    }

    pub fn sort(&self) -> Option<SortSpec> {
        self.with_table(|t| t.sort().cloned())
    }

    pub fn search_query(&self) -> String {
        self.with_table(|t| t.search_query().to_string())
    }

    pub fn loading(&self) -> bool {
        self.with_table(Table::loading)
    }

    pub fn is_refetching(&self) -> bool {
        self.inner.state.read(|s| s.is_refetching)
    }

    /// Returns the error of the last settled fetch, if it failed.
    pub fn error(&self) -> Option<FetchError> {
        self.inner.state.read(|s| s.error.clone())
    }

    /// Returns the parameters the next fetch would use.
    pub fn current_request(&self) -> PageRequest {
        self.inner.state.read(RemoteState::request)
    }

    /// Returns `true` while a fetch is in flight or a search is pending.
    pub fn is_busy(&self) -> bool {
        self.inner
            .state
            .read(|s| s.table.loading() || s.is_refetching || s.search_pending)
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.state.subscribe()
    }

    /// Waits until no fetch is in flight and no search is pending.
    pub async fn wait_idle(&self) {
        let mut changes = self.subscribe();
        while self.is_busy() {
            if changes.changed().await.is_err() {
                return;
            }
        }
    }
}

impl<F: PageFetcher> RemoteInner<F> {
    async fn run(&self, id: RequestId, request: PageRequest, kind: FetchKind) {
        let mut next = Some((id, request, kind));
        while let Some((id, request, kind)) = next.take() {
            let outcome = self.load(&request, kind).await;
            next = self
                .apply(id, &request, outcome)
                .map(|(id, request)| (id, request, FetchKind::Navigate));
        }
    }

    async fn load(&self, request: &PageRequest, kind: FetchKind) -> AsyncOutcome<RemotePage> {
        let key = request.cache_key();

        match kind {
            FetchKind::Refetch => self.cache.clear().await,
            FetchKind::Navigate => {
                if let Some(cached) = self.cache.get(&key).await {
                    log::debug!("page cache hit for {}", key);
                    return Ok(cached.page);
                }
            }
        }

        let outcome = self.fetcher.fetch_page(request.clone()).await;
        if let Ok(page) = &outcome {
            if self.cache_config.is_enabled() {
                let evicted = self.cache.gc().await;
                if evicted > 0 {
                    log::debug!("evicted {} expired pages", evicted);
                }
                let entry = CachedPage::with_ttl(page.clone(), self.cache_config.page_ttl);
                self.cache.set(&key, entry).await;
            }
        }
        outcome
    }

    /// Applies a response. Returns a follow-up fetch when the reported total
    /// moved the current page away from the one requested.
    fn apply(
        &self,
        id: RequestId,
        request: &PageRequest,
        outcome: AsyncOutcome<RemotePage>,
    ) -> Option<(RequestId, PageRequest)> {
        self.state.update(|s| {
            if !s.requests.is_current(id) {
                log::debug!("discarding stale response for fetch #{}", id);
                return None;
            }

            match outcome {
                Ok(page) => {
                    s.table.set_total(page.total);
                    if s.table.page() != request.page {
                        log::debug!(
                            "fetch #{}: page {} no longer exists (total {}), loading page {}",
                            id,
                            request.page,
                            page.total,
                            s.table.page()
                        );
                        s.table.set_data(Vec::new());
                        return Some(s.begin(FetchKind::Navigate));
                    }
                    s.table.set_data(page.rows);
                    s.error = None;
                }
                Err(err) => {
                    log::warn!("fetch #{} failed: {}", id, err);
                    s.table.set_data(Vec::new());
                    s.error = Some(err);
                }
            }
            s.table.set_loading(false);
            s.is_refetching = false;
            None
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;
    use crate::table::PaginationConfig;

    fn config() -> TableConfig {
        TableConfig::new(vec![Column::new("id", "ID"), Column::new("name", "Name")])
            .pagination(PaginationConfig::with_page_size(5))
    }

    async fn empty(_request: PageRequest) -> AsyncOutcome<RemotePage> {
        Ok(RemotePage::new(Vec::new(), 0))
    }

    #[test]
    fn test_request_reflects_local_state() {
        let table = RemoteTable::new(config(), empty).unwrap();

        assert_eq!(table.current_request(), PageRequest::first(5));
        assert!(!table.is_busy());
    }

    #[test]
    fn test_initial_data_is_ignored() {
        let table = RemoteTable::new(config().data(vec![Row::new().set("id", 1)]), empty).unwrap();

        assert!(table.page_data().is_empty());
        assert_eq!(table.pagination().map(|p| p.total), Some(0));
    }

    #[test]
    fn test_disabled_filtering_sends_empty_query() {
        let table = RemoteTable::new(
            config().filtering(crate::table::FilterConfig::disabled()),
            empty,
        )
        .unwrap();

        table.inner.state.update(|s| s.table.set_search_query("ada"));
        assert_eq!(table.search_query(), "ada");
        assert_eq!(table.current_request().search_query, "");
    }

    #[test]
    fn test_disabled_filtering_records_query_without_fetch() {
        let table = RemoteTable::new(
            config().filtering(crate::table::FilterConfig::disabled()),
            empty,
        )
        .unwrap();
        table.inner.state.update(|s| {
            s.table.set_total(23);
            s.table.set_page(3);
        });

        assert!(table.set_search_query("ada").is_none());
        assert_eq!(table.search_query(), "ada");
        assert_eq!(table.pagination().map(|p| p.page), Some(3));
        assert!(!table.is_busy());
    }
}

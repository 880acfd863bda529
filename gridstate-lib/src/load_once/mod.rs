//! Load-once table.
//!
//! A [`LoadOnceTable`] downloads the whole record set once on
//! [`mount`](LoadOnceTable::mount) and from then on sorts, filters and pages
//! locally. Only [`refetch`](LoadOnceTable::refetch) goes back to the data
//! source.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use tokio::sync::watch;

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

/// A data source that returns every record at once.
///
/// Any async function or closure
/// `Fn() -> impl Future<Output = AsyncOutcome<Vec<Row>>>` is a
/// `RecordFetcher`.
#[async_trait]
pub trait RecordFetcher: Send + Sync + 'static {
    /// Fetches the full record set.
    async fn fetch_all(&self) -> AsyncOutcome<Vec<Row>>;
}

#[async_trait]
impl<F, Fut> RecordFetcher for F
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = AsyncOutcome<Vec<Row>>> + Send + 'static,
{
    async fn fetch_all(&self) -> AsyncOutcome<Vec<Row>> {
        (self)().await
    }
}

#[derive(Debug)]
struct LoadOnceState {
    table: Table,
    error: Option<FetchError>,
    is_refetching: bool,
    requests: RequestGuard,
}

struct LoadOnceInner<F> {
    fetcher: F,
    state: SharedState<LoadOnceState>,
    mounted: AtomicBool,
}

/// A table loaded by a single fetch and operated locally afterwards.
///
/// Cheap to clone; clones share the same state.
///
/// # Example
///
/// ```ignore
/// let table = LoadOnceTable::new(config, || async { api.all_users().await })?;
///
/// table.mount();
/// table.wait_idle().await;
///
/// // Purely local from here on.
/// table.set_search_query("eng");
/// table.set_page(2);
/// ```
pub struct LoadOnceTable<F> {
    inner: Arc<LoadOnceInner<F>>,
}

impl<F> Clone for LoadOnceTable<F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<F: RecordFetcher> LoadOnceTable<F> {
    /// Creates a load-once table. The config's `data` is ignored.
    pub fn new(config: TableConfig, fetcher: F) -> Result<Self, ConfigError> {
        let table = Table::new(config.data(Vec::new()).mode(DataMode::Client))?;
        Ok(Self {
            inner: Arc::new(LoadOnceInner {
                fetcher,
                state: SharedState::new(LoadOnceState {
                    table,
                    error: None,
                    is_refetching: false,
                    requests: RequestGuard::default(),
                }),
                mounted: AtomicBool::new(false),
            }),
        })
    }

    /// Downloads the record set. Only the first call does anything.
    pub fn mount(&self) -> Option<FetchTicket> {
        if self.inner.mounted.swap(true, Ordering::SeqCst) {
            return None;
        }
        let id = self.inner.state.update(|s| {
            s.table.set_loading(true);
            s.requests.issue()
        });
        Some(self.spawn(id))
    }

    /// Downloads the record set again, raising `is_refetching`.
    pub fn refetch(&self) -> FetchTicket {
        self.inner.mounted.store(true, Ordering::SeqCst);
        let id = self.inner.state.update(|s| {
            s.is_refetching = true;
            s.requests.issue()
        });
        self.spawn(id)
    }

    fn spawn(&self, id: RequestId) -> FetchTicket {
        log::debug!("full load #{} issued", id);
        let inner = Arc::clone(&self.inner);
        FetchTicket::new(
            id,
            tokio::spawn(async move {
                let outcome = inner.fetcher.fetch_all().await;
                inner.apply(id, outcome);
            }),
        )
    }

    // =========================================================================
    // Local actions
    // =========================================================================

    pub fn set_sort(&self, sort: Option<SortSpec>) {
        self.update(|t| t.set_sort(sort));
    }

    pub fn toggle_sort(&self, key: &str) {
        self.update(|t| t.toggle_sort(key));
    }

    pub fn set_page(&self, page: i64) {
        self.update(|t| t.set_page(page));
    }

    pub fn next_page(&self) {
        self.update(Table::next_page);
    }

    pub fn prev_page(&self) {
        self.update(Table::prev_page);
    }

    pub fn set_page_size(&self, page_size: usize) {
        self.update(|t| t.set_page_size(page_size));
    }

    pub fn set_search_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.update(|t| t.set_search_query(query));
    }

    /// Restores the default view. A download in flight keeps `loading` set
    /// and still applies when it lands.
    pub fn reset(&self) {
        self.update(|t| {
            let loading = t.loading();
            t.reset();
            t.set_loading(loading);
        });
    }

    fn update(&self, f: impl FnOnce(&mut Table)) {
        self.inner.state.update(|s| f(&mut s.table));
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

    pub fn page_data(&self) -> Vec<Row> {
        self.with_table(|t| t.page_data().into_iter().cloned().collect())
    }

    pub fn pagination(&self) -> Option<PaginationInfo> {
        self.with_table(Table::pagination)
    }

    pub fn loading(&self) -> bool {
        self.with_table(Table::loading)
    }

    pub fn is_refetching(&self) -> bool {
        self.inner.state.read(|s| s.is_refetching)
    }

    pub fn error(&self) -> Option<FetchError> {
        self.inner.state.read(|s| s.error.clone())
    }

    /// Returns `true` while a download is in flight.
    pub fn is_busy(&self) -> bool {
        self.inner
            .state
            .read(|s| s.table.loading() || s.is_refetching)
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.state.subscribe()
    }

    /// Waits until no download is in flight.
    pub async fn wait_idle(&self) {
        let mut changes = self.subscribe();
        while self.is_busy() {
            if changes.changed().await.is_err() {
                return;
            }
        }
    }
}

impl<F> LoadOnceInner<F> {
    fn apply(&self, id: RequestId, outcome: AsyncOutcome<Vec<Row>>) {
        self.state.update(|s| {
            if !s.requests.is_current(id) {
                log::debug!("discarding stale full load #{}", id);
                return;
            }

            match outcome {
                Ok(rows) => {
                    log::debug!("full load #{} returned {} rows", id, rows.len());
                    s.table.set_data(rows);
                    s.error = None;
                }
                Err(err) => {
                    log::warn!("full load #{} failed: {}", id, err);
                    s.table.set_data(Vec::new());
                    s.error = Some(err);
                }
            }
            s.table.set_loading(false);
            s.is_refetching = false;
        });
    }
}

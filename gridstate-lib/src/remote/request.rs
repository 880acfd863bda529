//! Remote page requests and the fetch collaborator contract.

use std::future::Future;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;

use crate::error::AsyncOutcome;
use crate::model::Row;
use crate::pipeline::SortSpec;

/// Parameters of one remote page fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number, 1-based.
    pub page: usize,
    /// Rows per page.
    pub page_size: usize,
    /// Active sort, if any.
    pub sort: Option<SortSpec>,
    /// Current search query, possibly empty.
    pub search_query: String,
}

impl PageRequest {
    /// The first page with no sort and no query.
    pub fn first(page_size: usize) -> Self {
        Self {
            page: 1,
            page_size,
            sort: None,
            search_query: String::new(),
        }
    }

    /// Returns the canonical cache key for these parameters.
    ///
    /// Field order is fixed, so equal requests always produce equal keys.
    pub fn cache_key(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(
                "{}|{}|{:?}|{}",
                self.page, self.page_size, self.sort, self.search_query
            )
        })
    }

    /// Returns the zero-based offset of the first row on the page.
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1) * self.page_size
    }
}

/// One page of rows as reported by the data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemotePage {
    /// Rows on the requested page.
    pub rows: Vec<Row>,
    /// Total rows matching the request across all pages.
    pub total: usize,
}

impl RemotePage {
    /// Creates a page.
    pub fn new(rows: Vec<Row>, total: usize) -> Self {
        Self { rows, total }
    }
}

/// A data source that serves one page at a time.
///
/// Expected failures are returned as `Err(FetchError)`; the remote table
/// surfaces them through its `error()` accessor. Any async function or
/// closure `Fn(PageRequest) -> impl Future<Output = AsyncOutcome<RemotePage>>`
/// is a `PageFetcher`.
///
/// # Example
///
/// ```ignore
/// use gridstate_lib::remote::{PageFetcher, PageRequest, RemotePage};
///
/// struct UsersApi { client: reqwest::Client }
///
/// #[async_trait]
/// impl PageFetcher for UsersApi {
///     async fn fetch_page(&self, request: PageRequest) -> AsyncOutcome<RemotePage> {
///         let body = self.client.get(url_for(&request)).send().await
///             .map_err(|e| FetchError::remote(e.to_string()))?;
///         parse_page(body).await
///     }
/// }
/// ```
#[async_trait]
pub trait PageFetcher: Send + Sync + 'static {
    /// Fetches the page described by `request`.
    async fn fetch_page(&self, request: PageRequest) -> AsyncOutcome<RemotePage>;
}

#[async_trait]
impl<F, Fut> PageFetcher for F
where
    F: Fn(PageRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = AsyncOutcome<RemotePage>> + Send + 'static,
{
    async fn fetch_page(&self, request: PageRequest) -> AsyncOutcome<RemotePage> {
        (self)(request).await
    }
}

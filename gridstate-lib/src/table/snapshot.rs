//! Read-only views of table state for the render layer.

use crate::error::FetchError;
use crate::model::Row;
use crate::pipeline::PaginationInfo;
use crate::pipeline::SortSpec;

/// A borrowed view of a [`Table`](super::Table).
#[derive(Debug, Clone)]
pub struct TableState<'a> {
    pub raw_data: &'a [Row],
    /// Filtered rows in sorted order.
    pub filtered_data: Vec<&'a Row>,
    pub page_data: Vec<&'a Row>,
    pub sort: Option<&'a SortSpec>,
    pub pagination: Option<PaginationInfo>,
    pub search_query: &'a str,
    pub loading: bool,
}

/// An owned copy of what a render pass needs.
///
/// Async variants fill in `error` and `is_refetching`; a plain table always
/// reports `None` and `false`.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSnapshot {
    pub page_data: Vec<Row>,
    pub pagination: Option<PaginationInfo>,
    pub sort: Option<SortSpec>,
    pub search_query: String,
    pub loading: bool,
    pub is_refetching: bool,
    pub error: Option<FetchError>,
}

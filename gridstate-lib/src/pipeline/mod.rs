//! The derivation pipeline: filter → sort → paginate.
//!
//! Every stage is a pure function of its inputs. Stages work on row indices
//! so a derived view never copies rows.
//!
//! - [`filter`] - case-insensitive substring search over searchable columns
//! - [`sort`] - stable single-column sort
//! - [`paginate`] - page clamping and slicing
//! - [`derive`] - the three stages composed

mod filter;
mod order;
mod page;
mod sort;

pub use filter::filter;
pub use filter::is_active_query;
pub use filter::row_matches;
pub use order::Direction;
pub use order::SortSpec;
pub use page::PaginationInfo;
pub use page::clamp_page;
pub use page::page_count;
pub use page::paginate;
pub use sort::sort;

use std::ops::Range;

use crate::column::Column;
use crate::model::Row;

/// The text-search stage input.
#[derive(Debug, Clone)]
pub struct Search<'a> {
    /// Raw query as typed.
    pub query: &'a str,
    /// Columns the query is matched against.
    pub columns: Vec<&'a Column>,
}

/// Inputs to one pipeline run. A `None` stage is skipped.
#[derive(Debug, Clone, Default)]
pub struct Stages<'a> {
    /// Text search, `None` when filtering is disabled.
    pub search: Option<Search<'a>>,
    /// Resolved sort column and direction.
    pub sort: Option<(&'a Column, Direction)>,
    /// Requested page and page size, `None` when pagination is disabled.
    pub page: Option<(i64, usize)>,
}

/// The result of a pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct Derived {
    /// Indices of the filtered rows in sorted order.
    pub order: Vec<usize>,
    /// Clamped pagination, `None` when pagination is disabled.
    pub pagination: Option<PaginationInfo>,
}

impl Derived {
    /// Returns the slice bounds of the current page within `order`.
    pub fn page_range(&self) -> Range<usize> {
        match &self.pagination {
            Some(info) => info.range(),
            None => 0..self.order.len(),
        }
    }

    /// Returns the row indices on the current page.
    pub fn page_indices(&self) -> &[usize] {
        &self.order[self.page_range()]
    }
}

/// Runs filter, sort and paginate over `rows`.
pub fn derive(rows: &[Row], stages: &Stages<'_>) -> Derived {
    let filtered = match &stages.search {
        Some(search) => filter(rows, search.query, &search.columns),
        None => (0..rows.len()).collect(),
    };

    let order = match stages.sort {
        Some((column, direction)) => sort(rows, filtered, column, direction),
        None => filtered,
    };

    let pagination = stages
        .page
        .map(|(page, page_size)| PaginationInfo::new(page, page_size, order.len()));

    Derived { order, pagination }
}

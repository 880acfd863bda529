//! Table state store.
//!
//! A [`Table`] owns the raw rows and the user-controlled inputs (sort, search
//! query, page, page size, loading flag). Every action replaces one input and
//! re-runs the derivation pipeline, so the derived rows and pagination are
//! always consistent with the inputs.
//!
//! # Example
//!
//! ```
//! use gridstate_lib::column::Column;
//! use gridstate_lib::model::Row;
//! use gridstate_lib::pipeline::SortSpec;
//! use gridstate_lib::table::{PaginationConfig, Table, TableConfig};
//!
//! let rows = (1..=12).map(|i| Row::new().set("id", i)).collect();
//! let mut table = Table::new(
//!     TableConfig::new(vec![Column::new("id", "ID")])
//!         .data(rows)
//!         .pagination(PaginationConfig::with_page_size(5)),
//! )?;
//!
//! table.set_page(10);
//! assert_eq!(table.pagination().unwrap().page, 3);
//! assert_eq!(table.page_data().len(), 2);
//!
//! table.set_sort(Some(SortSpec::desc("id")));
//! assert_eq!(table.pagination().unwrap().page, 1);
//! # Ok::<(), gridstate_lib::error::ConfigError>(())
//! ```

mod config;
mod snapshot;

pub use config::*;
pub use snapshot::*;

use std::ops::Range;

use crate::column::Column;
use crate::error::ConfigError;
use crate::model::Row;
use crate::pipeline;
use crate::pipeline::PaginationInfo;
use crate::pipeline::Search;
use crate::pipeline::SortSpec;
use crate::pipeline::Stages;

/// Headless table state with a derived view.
#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Row>,
    sortable: bool,
    pagination_config: PaginationConfig,
    filtering: FilterConfig,
    mode: DataMode,

    sort: Option<SortSpec>,
    search_query: String,
    page: usize,
    page_size: usize,
    loading: bool,
    /// Row count reported by the data source in server mode.
    total: usize,

    /// Filtered, sorted indices into `rows`.
    order: Vec<usize>,
    /// Slice of `order` on the current page.
    visible: Range<usize>,
    pagination: Option<PaginationInfo>,
}

impl Table {
    /// Creates a table from a validated configuration.
    pub fn new(config: TableConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let TableConfig {
            columns,
            data,
            sortable,
            pagination,
            filtering,
            mode,
        } = config;

        let mut table = Self {
            columns,
            rows: data,
            sortable,
            pagination_config: pagination,
            filtering,
            mode,
            sort: None,
            search_query: String::new(),
            page: 1,
            page_size: pagination.page_size,
            loading: false,
            total: 0,
            order: Vec::new(),
            visible: 0..0,
            pagination: None,
        };
        table.rederive(1);
        Ok(table)
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Replaces the active sort and returns to page 1.
    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.sort = sort;
        self.rederive(1);
    }

    /// Advances the header-click sort cycle for `key` and returns to page 1.
    pub fn toggle_sort(&mut self, key: &str) {
        let next = SortSpec::cycle(self.sort.as_ref(), key);
        self.set_sort(next);
    }

    /// Moves to `page`, clamped into the valid range.
    pub fn set_page(&mut self, page: i64) {
        self.rederive(page);
    }

    /// Moves to the next page, if any.
    pub fn next_page(&mut self) {
        self.set_page(self.page as i64 + 1);
    }

    /// Moves to the previous page, if any.
    pub fn prev_page(&mut self) {
        self.set_page(self.page as i64 - 1);
    }

    /// Moves to the first page.
    pub fn first_page(&mut self) {
        self.set_page(1);
    }

    /// Moves to the last page.
    pub fn last_page(&mut self) {
        self.set_page(i64::MAX);
    }

    /// Replaces the page size and returns to page 1. Zero is treated as 1.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.rederive(1);
    }

    /// Replaces the search query and returns to page 1.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
        self.rederive(1);
    }

    /// Stores the query without re-deriving or moving the page.
    ///
    /// Only meaningful when filtering is disabled, where the query has no
    /// effect on the derived rows.
    pub(crate) fn record_search_query(&mut self, query: String) {
        self.search_query = query;
    }

    /// Replaces the loading flag. Nothing else changes.
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Restores sort, query, page, page size and loading to their defaults.
    ///
    /// Raw rows are kept.
    pub fn reset(&mut self) {
        self.sort = None;
        self.search_query.clear();
        self.page_size = self.pagination_config.page_size;
        self.loading = false;
        self.rederive(1);
    }

    /// Replaces the raw rows. The current page is clamped to the new data.
    pub fn set_data(&mut self, rows: Vec<Row>) {
        log::debug!("table data replaced: {} rows", rows.len());
        self.rows = rows;
        self.rederive(self.page as i64);
    }

    /// Sets the total row count reported by the data source.
    ///
    /// Only used in [`DataMode::Server`]; ignored otherwise.
    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        self.rederive(self.page as i64);
    }

    // =========================================================================
    // Read surface
    // =========================================================================

    /// Returns the column set.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the column with the given key.
    pub fn column(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.key() == key)
    }

    /// Returns the raw rows.
    pub fn raw_data(&self) -> &[Row] {
        &self.rows
    }

    /// Returns the rows that passed the filter, in sorted order.
    pub fn filtered_data(&self) -> Vec<&Row> {
        self.order.iter().map(|&i| &self.rows[i]).collect()
    }

    /// Returns the rows on the current page.
    pub fn page_data(&self) -> Vec<&Row> {
        self.order[self.visible.clone()]
            .iter()
            .map(|&i| &self.rows[i])
            .collect()
    }

    /// Returns pagination info, or `None` if pagination is disabled.
    pub fn pagination(&self) -> Option<PaginationInfo> {
        self.pagination
    }

    /// Returns the active sort.
    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    /// Returns the current search query.
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Returns the current page (1-based).
    pub fn page(&self) -> usize {
        self.page
    }

    /// Returns the current page size.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Returns the configured default page size.
    pub fn default_page_size(&self) -> usize {
        self.pagination_config.page_size
    }

    /// Returns the loading flag.
    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Returns the data mode.
    pub fn mode(&self) -> DataMode {
        self.mode
    }

    /// Returns `true` if sorting is enabled.
    pub fn sorting_enabled(&self) -> bool {
        self.sortable
    }

    /// Returns `true` if the search query filters rows.
    pub fn filtering_enabled(&self) -> bool {
        self.filtering.enabled
    }

    /// Returns a borrowed view of the whole state.
    pub fn state(&self) -> TableState<'_> {
        TableState {
            raw_data: &self.rows,
            filtered_data: self.filtered_data(),
            page_data: self.page_data(),
            sort: self.sort.as_ref(),
            pagination: self.pagination,
            search_query: &self.search_query,
            loading: self.loading,
        }
    }

    /// Returns an owned copy of the visible state.
    pub fn snapshot(&self) -> TableSnapshot {
        TableSnapshot {
            page_data: self.page_data().into_iter().cloned().collect(),
            pagination: self.pagination,
            sort: self.sort.clone(),
            search_query: self.search_query.clone(),
            loading: self.loading,
            is_refetching: false,
            error: None,
        }
    }

    // =========================================================================
    // Derivation
    // =========================================================================

    fn rederive(&mut self, requested_page: i64) {
        match self.mode {
            DataMode::Client => self.derive_client(requested_page),
            DataMode::Server => self.derive_server(requested_page),
        }
        self.page = self.pagination.map_or(1, |p| p.page);
    }

    fn derive_client(&mut self, requested_page: i64) {
        let derived = pipeline::derive(&self.rows, &self.stages(requested_page));
        self.visible = derived.page_range();
        self.pagination = derived.pagination;
        self.order = derived.order;
    }

    fn derive_server(&mut self, requested_page: i64) {
        self.order = (0..self.rows.len()).collect();
        self.visible = 0..self.rows.len();
        self.pagination = self
            .pagination_config
            .enabled
            .then(|| PaginationInfo::new(requested_page, self.page_size, self.total));
    }

    fn stages(&self, requested_page: i64) -> Stages<'_> {
        let search = self.filtering.enabled.then(|| Search {
            query: &self.search_query,
            columns: self.searchable_columns(),
        });

        Stages {
            search,
            sort: self.active_sort(),
            page: self
                .pagination_config
                .enabled
                .then_some((requested_page, self.page_size)),
        }
    }

    fn searchable_columns(&self) -> Vec<&Column> {
        match &self.filtering.searchable_columns {
            Some(keys) => self
                .columns
                .iter()
                .filter(|c| keys.iter().any(|k| k == c.key()))
                .collect(),
            None => self.columns.iter().collect(),
        }
    }

    fn active_sort(&self) -> Option<(&Column, pipeline::Direction)> {
        if !self.sortable {
            return None;
        }
        let spec = self.sort.as_ref()?;
        match self.column(&spec.key) {
            Some(column) if column.is_sortable() => Some((column, spec.direction)),
            Some(_) => {
                log::debug!("column '{}' is not sortable, sort ignored", spec.key);
                None
            }
            None => {
                log::debug!("unknown sort column '{}', sort ignored", spec.key);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::SortKey;
    use crate::model::Value;

    const DEPARTMENTS: [&str; 12] = [
        "Engineering",
        "Sales",
        "Marketing",
        "Sales",
        "engineering",
        "Support",
        "Finance",
        "Sales",
        "Marketing",
        "Support",
        "Finance",
        "Platform Eng",
    ];

    fn employees() -> Vec<Row> {
        DEPARTMENTS
            .iter()
            .enumerate()
            .map(|(i, dept)| {
                Row::new()
                    .set("id", i as i64 + 1)
                    .set("name", format!("Employee {}", i + 1))
                    .set("department", *dept)
            })
            .collect()
    }

    fn columns() -> Vec<Column> {
        vec![
            Column::new("id", "ID")
                .sort_by(|row| SortKey::from(row.get("id").and_then(Value::as_f64))),
            Column::new("name", "Name"),
            Column::new("department", "Department"),
        ]
    }

    fn table(page_size: usize) -> Table {
        Table::new(
            TableConfig::new(columns())
                .data(employees())
                .pagination(PaginationConfig::with_page_size(page_size)),
        )
        .unwrap()
    }

    fn ids(rows: &[&Row]) -> Vec<i64> {
        rows.iter()
            .map(|r| match r.get("id") {
                Some(Value::Int(n)) => *n,
                _ => -1,
            })
            .collect()
    }

    #[test]
    fn test_basic_pagination() {
        let mut table = table(5);
        assert_eq!(table.page_data().len(), 5);

        table.set_page(2);
        assert_eq!(table.page_data().len(), 5);

        table.set_page(3);
        assert_eq!(table.page_data().len(), 2);

        table.set_page(10);
        assert_eq!(table.page(), 3);
        assert_eq!(table.pagination().unwrap().page, 3);
    }

    #[test]
    fn test_search_narrows_total() {
        let mut table = Table::new(
            TableConfig::new(columns())
                .data(employees())
                .pagination(PaginationConfig::with_page_size(5))
                .filtering(FilterConfig::columns(["department"])),
        )
        .unwrap();

        table.set_search_query("eng");
        assert_eq!(table.pagination().unwrap().total, 3);
        assert_eq!(ids(&table.page_data()), vec![1, 5, 12]);
    }

    #[test]
    fn test_set_page_clamps_every_input() {
        let mut table = table(5);
        for n in [i64::MIN, -3, 0, 1, 2, 3, 4, 99, i64::MAX] {
            table.set_page(n);
            let page = table.pagination().unwrap().page;
            assert!((1..=3).contains(&page), "page {} for input {}", page, n);
        }
    }

    #[test]
    fn test_set_page_size_resets_page() {
        let mut table = table(5);
        table.set_page(3);
        table.set_page_size(4);
        assert_eq!(table.page(), 1);
        assert_eq!(table.pagination().unwrap().page_count(), 3);

        table.set_page(2);
        table.set_page_size(4);
        assert_eq!(table.page(), 1);
    }

    #[test]
    fn test_sort_and_query_reset_page() {
        let mut table = table(5);
        table.set_page(2);
        table.set_sort(Some(SortSpec::desc("id")));
        assert_eq!(table.page(), 1);
        assert_eq!(ids(&table.page_data()), vec![12, 11, 10, 9, 8]);

        table.set_page(2);
        table.set_search_query("employee");
        assert_eq!(table.page(), 1);
    }

    #[test]
    fn test_toggle_sort_cycle() {
        let mut table = table(20);
        table.toggle_sort("id");
        assert_eq!(table.sort(), Some(&SortSpec::asc("id")));
        table.toggle_sort("id");
        assert_eq!(table.sort(), Some(&SortSpec::desc("id")));
        assert_eq!(ids(&table.page_data())[0], 12);
        table.toggle_sort("id");
        assert_eq!(table.sort(), None);
        assert_eq!(ids(&table.page_data())[0], 1);
    }

    #[test]
    fn test_unknown_sort_column_keeps_order() {
        let mut table = table(20);
        table.set_sort(Some(SortSpec::asc("salary")));
        assert_eq!(ids(&table.page_data()), (1..=12).collect::<Vec<_>>());
    }

    #[test]
    fn test_unsortable_column_keeps_order() {
        let mut table = Table::new(
            TableConfig::new(vec![Column::new("id", "ID").sortable(false)]).data(employees()),
        )
        .unwrap();
        table.set_sort(Some(SortSpec::desc("id")));
        assert_eq!(ids(&table.page_data())[0], 1);
    }

    #[test]
    fn test_sorting_disabled() {
        let mut table = Table::new(
            TableConfig::new(columns())
                .data(employees())
                .sortable(false),
        )
        .unwrap();
        table.set_sort(Some(SortSpec::desc("id")));
        assert_eq!(ids(&table.page_data())[0], 1);
    }

    #[test]
    fn test_filtering_disabled_ignores_query() {
        let mut table = Table::new(
            TableConfig::new(columns())
                .data(employees())
                .filtering(FilterConfig::disabled())
                .pagination(PaginationConfig::disabled()),
        )
        .unwrap();
        table.set_search_query("nothing matches this");
        assert_eq!(table.page_data().len(), 12);
        assert_eq!(table.search_query(), "nothing matches this");
    }

    #[test]
    fn test_pagination_disabled() {
        let mut table = Table::new(
            TableConfig::new(columns())
                .data(employees())
                .pagination(PaginationConfig::disabled()),
        )
        .unwrap();
        table.set_page(3);
        assert!(table.pagination().is_none());
        assert_eq!(table.page_data().len(), 12);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut table = table(5);
        table.set_sort(Some(SortSpec::desc("id")));
        table.set_search_query("sales");
        table.set_page_size(2);
        table.set_page(2);
        table.set_loading(true);

        table.reset();
        let once = table.snapshot();
        table.reset();
        let twice = table.snapshot();

        assert_eq!(once, twice);
        assert_eq!(once.sort, None);
        assert_eq!(once.search_query, "");
        assert_eq!(once.pagination.unwrap().page, 1);
        assert_eq!(once.pagination.unwrap().page_size, 5);
        assert!(!once.loading);
        assert_eq!(table.raw_data().len(), 12);
    }

    #[test]
    fn test_set_loading_changes_nothing_else() {
        let mut table = table(5);
        table.set_page(2);
        let before = table.page_data().len();
        table.set_loading(true);
        assert!(table.loading());
        assert_eq!(table.page(), 2);
        assert_eq!(table.page_data().len(), before);
    }

    #[test]
    fn test_set_data_clamps_page() {
        let mut table = table(5);
        table.set_page(3);
        table.set_data(employees().into_iter().take(4).collect());
        assert_eq!(table.page(), 1);
        assert_eq!(table.page_data().len(), 4);
    }

    #[test]
    fn test_navigation_helpers() {
        let mut table = table(5);
        table.next_page();
        assert_eq!(table.page(), 2);
        table.last_page();
        assert_eq!(table.page(), 3);
        table.next_page();
        assert_eq!(table.page(), 3);
        table.prev_page();
        assert_eq!(table.page(), 2);
        table.first_page();
        assert_eq!(table.page(), 1);
        table.prev_page();
        assert_eq!(table.page(), 1);
    }

    #[test]
    fn test_server_mode_uses_reported_total() {
        let mut table = Table::new(
            TableConfig::new(columns())
                .pagination(PaginationConfig::with_page_size(5))
                .mode(DataMode::Server),
        )
        .unwrap();

        table.set_data(employees().into_iter().take(5).collect());
        table.set_total(42);
        table.set_page(4);

        let info = table.pagination().unwrap();
        assert_eq!(info.total, 42);
        assert_eq!(info.page, 4);
        assert_eq!(table.page_data().len(), 5);

        // No local filtering in server mode.
        table.set_search_query("zzz");
        assert_eq!(table.page_data().len(), 5);
    }

    #[test]
    fn test_state_view() {
        let mut table = table(5);
        table.set_search_query("sales");
        let state = table.state();
        assert_eq!(state.raw_data.len(), 12);
        assert_eq!(state.filtered_data.len(), 3);
        assert_eq!(state.page_data.len(), 3);
        assert_eq!(state.search_query, "sales");
    }

    #[test]
    fn test_config_errors_propagate() {
        let result = Table::new(TableConfig::new(vec![
            Column::new("id", "ID"),
            Column::new("id", "Duplicate"),
        ]));
        assert!(matches!(result, Err(ConfigError::DuplicateColumn { .. })));
    }
}

//! Table configuration

use std::collections::HashSet;

use crate::column::Column;
use crate::error::ConfigError;
use crate::model::Row;

/// Default rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Pagination settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    /// Whether rows are split into pages.
    pub enabled: bool,
    /// Page size on creation and after `reset()`.
    ///
    /// Default: 10
    pub page_size: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationConfig {
    /// Enabled pagination with the given default page size.
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            enabled: true,
            page_size,
        }
    }

    /// Pagination switched off: every row is on the one page.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }
}

/// Text filtering settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    /// Whether the search query filters rows.
    pub enabled: bool,
    /// Column keys the query is matched against. `None` means all columns.
    pub searchable_columns: Option<Vec<String>>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            searchable_columns: None,
        }
    }
}

impl FilterConfig {
    /// Filtering restricted to the given column keys.
    pub fn columns<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            enabled: true,
            searchable_columns: Some(keys.into_iter().map(Into::into).collect()),
        }
    }

    /// Filtering switched off: the query is stored but ignored.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            searchable_columns: None,
        }
    }
}

/// Where filtering, sorting and slicing happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataMode {
    /// The table derives everything from its raw rows.
    #[default]
    Client,
    /// The raw rows already are the current page. The total row count is
    /// supplied with `Table::set_total`.
    Server,
}

/// Configuration for a [`Table`](super::Table).
///
/// # Example
///
/// ```
/// use gridstate_lib::column::Column;
/// use gridstate_lib::table::{FilterConfig, PaginationConfig, TableConfig};
///
/// let config = TableConfig::new(vec![
///     Column::new("name", "Name"),
///     Column::new("department", "Department"),
/// ])
/// .pagination(PaginationConfig::with_page_size(5))
/// .filtering(FilterConfig::columns(["department"]));
/// ```
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Column set. Keys must be unique.
    pub columns: Vec<Column>,
    /// Initial rows.
    pub data: Vec<Row>,
    /// Whether sorting is applied.
    ///
    /// Default: true
    pub sortable: bool,
    /// Pagination settings.
    pub pagination: PaginationConfig,
    /// Filtering settings.
    pub filtering: FilterConfig,
    /// Client- or server-side derivation.
    pub mode: DataMode,
}

impl TableConfig {
    /// Creates a config with default settings and no rows.
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            data: Vec::new(),
            sortable: true,
            pagination: PaginationConfig::default(),
            filtering: FilterConfig::default(),
            mode: DataMode::Client,
        }
    }

    /// Sets the initial rows.
    pub fn data(mut self, data: Vec<Row>) -> Self {
        self.data = data;
        self
    }

    /// Enables or disables sorting.
    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    /// Sets the pagination settings.
    pub fn pagination(mut self, pagination: PaginationConfig) -> Self {
        self.pagination = pagination;
        self
    }

    /// Sets the filtering settings.
    pub fn filtering(mut self, filtering: FilterConfig) -> Self {
        self.filtering = filtering;
        self
    }

    /// Sets the data mode.
    pub fn mode(mut self, mode: DataMode) -> Self {
        self.mode = mode;
        self
    }

    /// Checks column keys, searchable keys and the page size.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.key()) {
                return Err(ConfigError::duplicate_column(column.key()));
            }
        }

        if let Some(keys) = &self.filtering.searchable_columns {
            if let Some(unknown) = keys.iter().find(|k| !seen.contains(k.as_str())) {
                return Err(ConfigError::unknown_search_column(unknown.clone()));
            }
        }

        if self.pagination.page_size == 0 {
            return Err(ConfigError::InvalidPageSize);
        }

        Ok(())
    }
}

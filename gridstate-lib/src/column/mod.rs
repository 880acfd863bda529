//! Column definitions and value resolution.
//!
//! A [`Column`] is a named projection from a [`Row`] to a value the table can
//! search, sort and display. The engine only uses the accessor, the sortable
//! flag and the optional sort-key extractor; header, width, alignment and the
//! cell renderer are carried untouched for the render layer.
//!
//! # Example
//!
//! ```
//! use gridstate_lib::column::{Column, SortKey};
//! use gridstate_lib::model::Value;
//!
//! let columns = vec![
//!     Column::new("name", "Name").width(30),
//!     Column::new("city", "City").path("address.city"),
//!     Column::new("salary", "Salary")
//!         .sort_by(|row| row.get("salary").and_then(Value::as_f64).into()),
//!     Column::new("actions", "").sortable(false),
//! ];
//! ```

mod accessor;

pub use accessor::*;

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::model::Row;
use crate::model::Value;

/// A sort-key extractor.
pub type SortKeyFn = Arc<dyn Fn(&Row) -> SortKey + Send + Sync>;

/// A cell renderer: `(value, row) -> presentation`.
pub type CellRenderer = Arc<dyn Fn(&Value, &Row) -> String + Send + Sync>;

/// Horizontal alignment for column content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// A raw scalar used for typed sorting.
///
/// Ordering: `Missing` < any `Number` < any `Text`. Numbers compare by
/// IEEE total order, text compares lexicographically.
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    Missing,
    Number(f64),
    Text(String),
}

impl SortKey {
    fn rank(&self) -> u8 {
        match self {
            SortKey::Missing => 0,
            SortKey::Number(_) => 1,
            SortKey::Text(_) => 2,
        }
    }

    /// Compares two keys.
    pub fn compare(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl From<f64> for SortKey {
    fn from(v: f64) -> Self {
        SortKey::Number(v)
    }
}

impl From<i64> for SortKey {
    fn from(v: i64) -> Self {
        SortKey::Number(v as f64)
    }
}

impl From<String> for SortKey {
    fn from(v: String) -> Self {
        SortKey::Text(v)
    }
}

impl From<&str> for SortKey {
    fn from(v: &str) -> Self {
        SortKey::Text(v.to_string())
    }
}

impl<T: Into<SortKey>> From<Option<T>> for SortKey {
    fn from(v: Option<T>) -> Self {
        v.map_or(SortKey::Missing, Into::into)
    }
}

/// Column configuration.
#[derive(Clone)]
pub struct Column {
    key: String,
    header: String,
    accessor: Accessor,
    sortable: bool,
    sort_key: Option<SortKeyFn>,
    width: Option<u16>,
    align: Alignment,
    render: Option<CellRenderer>,
}

impl Column {
    /// Creates a column whose accessor is the field named `key`.
    pub fn new(key: impl Into<String>, header: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            accessor: Accessor::path(&key),
            key,
            header: header.into(),
            sortable: true,
            sort_key: None,
            width: None,
            align: Alignment::Left,
            render: None,
        }
    }

    /// Reads the value from a (possibly dotted) field path instead of `key`.
    pub fn path(mut self, path: &str) -> Self {
        self.accessor = Accessor::path(path);
        self
    }

    /// Computes the value from the whole row.
    pub fn computed<F>(mut self, f: F) -> Self
    where
        F: Fn(&Row) -> Value + Send + Sync + 'static,
    {
        self.accessor = Accessor::computed(f);
        self
    }

    /// Sets whether the column can be sorted.
    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    /// Sorts by a raw scalar instead of the column's text.
    pub fn sort_by<F>(mut self, f: F) -> Self
    where
        F: Fn(&Row) -> SortKey + Send + Sync + 'static,
    {
        self.sort_key = Some(Arc::new(f));
        self
    }

    /// Sets the display width.
    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    /// Sets the column alignment.
    pub fn align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    /// Sets a cell renderer.
    pub fn render<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &Row) -> String + Send + Sync + 'static,
    {
        self.render = Some(Arc::new(f));
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn accessor(&self) -> &Accessor {
        &self.accessor
    }

    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    pub fn column_width(&self) -> Option<u16> {
        self.width
    }

    pub fn alignment(&self) -> Alignment {
        self.align
    }

    /// Resolves this column's value from a row.
    pub fn resolve<'a>(&self, row: &'a Row) -> Resolved<'a> {
        self.accessor.resolve(row)
    }

    /// Returns the text used for searching and default sorting.
    pub fn text(&self, row: &Row) -> String {
        self.resolve(row).to_text()
    }

    /// Returns the typed sort key, if the column defines one.
    pub fn sort_key(&self, row: &Row) -> Option<SortKey> {
        self.sort_key.as_ref().map(|f| f(row))
    }

    /// Returns `true` if the column sorts by a typed key.
    pub fn has_sort_key(&self) -> bool {
        self.sort_key.is_some()
    }

    /// Renders a cell for display.
    ///
    /// Uses the column renderer when set, the value's text otherwise.
    pub fn render_cell(&self, row: &Row) -> String {
        match &self.render {
            Some(render) => {
                let value = self.resolve(row).into_value();
                render(&value, row)
            }
            None => self.text(row),
        }
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("header", &self.header)
            .field("accessor", &self.accessor)
            .field("sortable", &self.sortable)
            .field("sort_key", &self.sort_key.is_some())
            .field("width", &self.width)
            .field("align", &self.align)
            .field("render", &self.render.is_some())
            .finish()
    }
}

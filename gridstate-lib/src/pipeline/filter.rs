//! Case-insensitive substring filtering.

use crate::column::Column;
use crate::model::Row;

/// Returns `true` if `query` should filter anything.
pub fn is_active_query(query: &str) -> bool {
    !query.trim().is_empty()
}

/// Returns `true` if any of `columns` contains `needle` in `row`.
///
/// `needle` must already be trimmed and lower-cased.
pub fn row_matches(row: &Row, needle: &str, columns: &[&Column]) -> bool {
    columns
        .iter()
        .any(|column| column.text(row).to_lowercase().contains(needle))
}

/// Filters `rows` by `query` over the searchable `columns`.
///
/// Returns the indices of the retained rows in their original order. An
/// empty or whitespace-only query retains every row.
///
/// # Example
///
/// ```
/// use gridstate_lib::column::Column;
/// use gridstate_lib::model::Row;
/// use gridstate_lib::pipeline::filter;
///
/// let rows = vec![
///     Row::new().set("dept", "Engineering"),
///     Row::new().set("dept", "Sales"),
/// ];
/// let dept = Column::new("dept", "Department");
///
/// assert_eq!(filter(&rows, "ENG", &[&dept]), vec![0]);
/// assert_eq!(filter(&rows, "  ", &[&dept]), vec![0, 1]);
/// ```
pub fn filter(rows: &[Row], query: &str, columns: &[&Column]) -> Vec<usize> {
    if !is_active_query(query) {
        return (0..rows.len()).collect();
    }

    let needle = query.trim().to_lowercase();
    rows.iter()
        .enumerate()
        .filter(|(_, row)| row_matches(row, &needle, columns))
        .map(|(index, _)| index)
        .collect()
}

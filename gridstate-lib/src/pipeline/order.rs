//! Sort specification types.

use serde::Deserialize;
use serde::Serialize;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

impl Direction {
    /// Returns the opposite direction.
    pub fn flip(self) -> Self {
        match self {
            Direction::Asc => Direction::Desc,
            Direction::Desc => Direction::Asc,
        }
    }
}

/// The active sort: one column and a direction.
///
/// Only one sort is active at a time.
///
/// # Example
///
/// ```
/// use gridstate_lib::pipeline::{Direction, SortSpec};
///
/// let sort = SortSpec::desc("salary");
/// assert_eq!(sort.key, "salary");
/// assert_eq!(sort.direction, Direction::Desc);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    /// Column key.
    pub key: String,
    /// Sort direction.
    pub direction: Direction,
}

impl SortSpec {
    /// Creates a sort spec.
    pub fn new(key: impl Into<String>, direction: Direction) -> Self {
        Self {
            key: key.into(),
            direction,
        }
    }

    /// Creates an ascending sort on a column.
    pub fn asc(key: impl Into<String>) -> Self {
        Self::new(key, Direction::Asc)
    }

    /// Creates a descending sort on a column.
    pub fn desc(key: impl Into<String>) -> Self {
        Self::new(key, Direction::Desc)
    }

    /// Returns the next sort in the header-click cycle for `key`.
    ///
    /// Same column: asc → desc → none. Another column (or none): asc.
    pub fn cycle(current: Option<&SortSpec>, key: &str) -> Option<SortSpec> {
        match current {
            Some(spec) if spec.key == key => match spec.direction {
                Direction::Asc => Some(SortSpec::desc(key)),
                Direction::Desc => None,
            },
            _ => Some(SortSpec::asc(key)),
        }
    }
}

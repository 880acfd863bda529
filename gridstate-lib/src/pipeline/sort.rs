//! Stable single-column sorting.

use std::cmp::Ordering;

use super::Direction;
use crate::column::Column;
use crate::model::Row;

/// Stable-sorts `order` (indices into `rows`) by `column`.
///
/// `Desc` reverses the comparator, not the output, so rows with equal keys
/// keep their relative order in both directions.
///
/// # Example
///
/// ```
/// use gridstate_lib::column::Column;
/// use gridstate_lib::model::Row;
/// use gridstate_lib::pipeline::{sort, Direction};
///
/// let rows = vec![
///     Row::new().set("name", "b"),
///     Row::new().set("name", "a"),
/// ];
/// let name = Column::new("name", "Name");
///
/// assert_eq!(sort(&rows, vec![0, 1], &name, Direction::Asc), vec![1, 0]);
/// ```
pub fn sort(rows: &[Row], mut order: Vec<usize>, column: &Column, direction: Direction) -> Vec<usize> {
    if column.has_sort_key() {
        // Extract once; extractors may be costly.
        let keys: Vec<_> = rows.iter().map(|row| column.sort_key(row)).collect();
        order.sort_by(|&a, &b| {
            let ord = match (&keys[a], &keys[b]) {
                (Some(ka), Some(kb)) => ka.compare(kb),
                _ => Ordering::Equal,
            };
            apply_direction(ord, direction)
        });
    } else {
        let texts: Vec<String> = rows.iter().map(|row| column.text(row)).collect();
        order.sort_by(|&a, &b| apply_direction(texts[a].cmp(&texts[b]), direction));
    }
    order
}

fn apply_direction(ord: Ordering, direction: Direction) -> Ordering {
    match direction {
        Direction::Asc => ord,
        Direction::Desc => ord.reverse(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::SortKey;
    use crate::model::Value;

    fn rows() -> Vec<Row> {
        vec![
            Row::new().set("id", 0).set("team", "red").set("score", 10),
            Row::new().set("id", 1).set("team", "blue").set("score", 9),
            Row::new().set("id", 2).set("team", "red").set("score", 100),
            Row::new().set("id", 3).set("team", "blue").set("score", 9),
            Row::new().set("id", 4).set("team", "green").set("score", 2),
        ]
    }

    fn all(rows: &[Row]) -> Vec<usize> {
        (0..rows.len()).collect()
    }

    #[test]
    fn test_lexicographic_by_default() {
        let rows = rows();
        let score = Column::new("score", "Score");

        // "10" < "100" < "2" < "9" < "9"
        assert_eq!(sort(&rows, all(&rows), &score, Direction::Asc), vec![0, 2, 4, 1, 3]);
    }

    #[test]
    fn test_typed_sort_key_is_numeric() {
        let rows = rows();
        let score = Column::new("score", "Score")
            .sort_by(|row| SortKey::from(row.get("score").and_then(Value::as_f64)));

        assert_eq!(sort(&rows, all(&rows), &score, Direction::Asc), vec![4, 1, 3, 0, 2]);
    }

    #[test]
    fn test_stable_in_both_directions() {
        let rows = rows();
        let team = Column::new("team", "Team");

        assert_eq!(sort(&rows, all(&rows), &team, Direction::Asc), vec![1, 3, 4, 0, 2]);
        assert_eq!(sort(&rows, all(&rows), &team, Direction::Desc), vec![0, 2, 4, 1, 3]);
    }

    #[test]
    fn test_desc_differs_from_reversed_asc_at_ties() {
        let rows = rows();
        let team = Column::new("team", "Team");

        let mut reversed = sort(&rows, all(&rows), &team, Direction::Asc);
        reversed.reverse();
        let desc = sort(&rows, all(&rows), &team, Direction::Desc);

        assert_ne!(reversed, desc);
        assert_eq!(reversed, vec![2, 0, 4, 3, 1]);
    }

    #[test]
    fn test_sorts_subset_only() {
        let rows = rows();
        let team = Column::new("team", "Team");

        assert_eq!(sort(&rows, vec![4, 2, 1], &team, Direction::Asc), vec![1, 4, 2]);
    }
}

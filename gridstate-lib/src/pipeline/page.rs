//! Page clamping and slicing.

use std::ops::Range;

use serde::Deserialize;
use serde::Serialize;

/// Pagination state for a derived row set.
///
/// `page` is 1-based and always lies in `[1, page_count]`, where
/// `page_count = max(1, ceil(total / page_size))`.
///
/// # Example
///
/// ```
/// use gridstate_lib::pipeline::PaginationInfo;
///
/// let info = PaginationInfo::new(10, 5, 12);
/// assert_eq!(info.page, 3);
/// assert_eq!(info.page_count(), 3);
/// assert_eq!(info.range(), 10..12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationInfo {
    /// Current page, 1-based.
    pub page: usize,
    /// Rows per page.
    pub page_size: usize,
    /// Rows after filtering, before slicing.
    pub total: usize,
}

impl PaginationInfo {
    /// Creates pagination info, clamping `page` into range.
    ///
    /// Any requested page is accepted, including zero, negative and far
    /// beyond the end. A zero `page_size` is treated as 1.
    pub fn new(page: i64, page_size: usize, total: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            page: clamp_page(page, page_size, total),
            page_size,
            total,
        }
    }

    /// Returns the number of pages, at least 1.
    pub fn page_count(&self) -> usize {
        page_count(self.page_size, self.total)
    }

    /// Returns the slice bounds of the current page within the row set.
    pub fn range(&self) -> Range<usize> {
        let start = ((self.page - 1) * self.page_size).min(self.total);
        let end = (self.page * self.page_size).min(self.total);
        start..end
    }

    /// Returns `true` if there is a page after the current one.
    pub fn has_next(&self) -> bool {
        self.page < self.page_count()
    }

    /// Returns `true` if there is a page before the current one.
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Returns the 1-based first and last row numbers shown, or `None`
    /// when there are no rows.
    pub fn showing(&self) -> Option<(usize, usize)> {
        let range = self.range();
        if range.is_empty() {
            None
        } else {
            Some((range.start + 1, range.end))
        }
    }
}

/// Returns `max(1, ceil(total / page_size))`.
pub fn page_count(page_size: usize, total: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

/// Clamps a requested page into `[1, page_count]`.
pub fn clamp_page(page: i64, page_size: usize, total: usize) -> usize {
    let last = page_count(page_size, total);
    if page < 1 {
        1
    } else {
        usize::try_from(page).map_or(last, |p| p.min(last))
    }
}

/// Slices `order` to the current page.
///
/// Returns the page slice together with the clamped pagination info.
pub fn paginate<T>(order: &[T], page: i64, page_size: usize) -> (&[T], PaginationInfo) {
    let info = PaginationInfo::new(page, page_size, order.len());
    (&order[info.range()], info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_pages() {
        let rows: Vec<usize> = (0..12).collect();

        let (page, info) = paginate(&rows, 1, 5);
        assert_eq!(page, &[0, 1, 2, 3, 4]);
        assert_eq!(info.page_count(), 3);

        let (page, _) = paginate(&rows, 2, 5);
        assert_eq!(page, &[5, 6, 7, 8, 9]);

        let (page, _) = paginate(&rows, 3, 5);
        assert_eq!(page, &[10, 11]);
    }

    #[test]
    fn test_clamps_any_page() {
        for requested in [i64::MIN, -5, 0, 1, 2, 3, 4, 10, i64::MAX] {
            let info = PaginationInfo::new(requested, 5, 12);
            assert!(info.page >= 1 && info.page <= 3, "page {} not clamped", requested);
        }
        assert_eq!(PaginationInfo::new(10, 5, 12).page, 3);
        assert_eq!(PaginationInfo::new(-1, 5, 12).page, 1);
    }

    #[test]
    fn test_empty_set_has_one_page() {
        let info = PaginationInfo::new(4, 10, 0);
        assert_eq!(info.page, 1);
        assert_eq!(info.page_count(), 1);
        assert!(info.range().is_empty());
        assert_eq!(info.showing(), None);
        assert!(!info.has_next());
        assert!(!info.has_prev());
    }

    #[test]
    fn test_zero_page_size_is_one() {
        let info = PaginationInfo::new(2, 0, 3);
        assert_eq!(info.page_size, 1);
        assert_eq!(info.page, 2);
        assert_eq!(info.range(), 1..2);
    }

    #[test]
    fn test_showing_and_navigation() {
        let info = PaginationInfo::new(2, 5, 12);
        assert_eq!(info.showing(), Some((6, 10)));
        assert!(info.has_next());
        assert!(info.has_prev());
    }
}

//! Fixed-size page slicing over an already fetched result list.
//!
//! Page `n` covers indices `[(n - 1) * 12, n * 12)`, clamped to the list.
//! Nothing here touches the network; changing page is a pure re-slice.

use std::ops::Range;

/// Number of offers shown per page.
pub const PAGE_SIZE: usize = 12;

/// Index range of `page` within a list of `len` items.
///
/// Page `0` is treated as page `1`. Pages past the end yield an empty range.
#[must_use]
pub fn page_bounds(len: usize, page: usize) -> Range<usize> {
    let page = page.max(1);
    let lower = (page - 1).saturating_mul(PAGE_SIZE).min(len);
    let upper = page.saturating_mul(PAGE_SIZE).min(len);
    lower..upper
}

/// Returns the slice of `all` shown on `page`.
#[must_use]
pub fn paginate<T>(all: &[T], page: usize) -> &[T] {
    &all[page_bounds(all.len(), page)]
}

/// Page count for `len` results: `len / 12` rounded half up, never below 1.
///
/// Rounding rather than ceiling means a short trailing page (fewer than six
/// items) is not counted, although [`paginate`] still serves it.
#[must_use]
pub fn page_count(len: usize) -> usize {
    (len.saturating_add(PAGE_SIZE / 2) / PAGE_SIZE).max(1)
}

//! Page-number pagination for list endpoints.
//!
//! Response envelope: `{count, next, previous, results}` where `next` and
//! `previous` are 1-based page numbers (null at either edge). A page past
//! the end yields empty `results` with the correct total `count`.

use serde::Serialize;

/// One page of results.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    /// Total number of matching items across all pages.
    pub count: usize,
    /// Next page number, if any.
    pub next: Option<u32>,
    /// Previous page number, if any.
    pub previous: Option<u32>,
    /// Items on this page.
    pub results: Vec<T>,
}

/// Slice `items` into the requested page.
///
/// `page` is 1-based; 0 is treated as 1.
#[must_use]
pub fn paginate<T>(items: Vec<T>, page: u32, page_size: usize) -> Page<T> {
    let page = page.max(1);
    let count = items.len();
    let start = (page as usize - 1).saturating_mul(page_size);

    let results: Vec<T> = items.into_iter().skip(start).take(page_size).collect();

    let next = (start + page_size < count).then(|| page + 1);
    let previous = (page > 1).then(|| page - 1);

    Page {
        count,
        next,
        previous,
        results,
    }
}

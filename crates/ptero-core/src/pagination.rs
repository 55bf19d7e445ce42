//! Page walking for list endpoints.
//!
//! The panel paginates every list with a 1-based `page` query parameter and
//! reports its position in `meta.pagination`. [`walk_pages`] follows those
//! reports until the last page and returns every item in order.

use crate::error::{Error, Result};
use crate::types::RecordList;
use std::future::Future;
use tracing::debug;

/// Query key carrying the page number.
pub const PAGE_QUERY_KEY: &str = "page";

/// Collect the items of `first` and of every page after it.
///
/// `fetch_page` is called with the page number to request, which is always
/// the `current_page` of the most recently fetched page plus one. The walk
/// stops once a page reports `current_page >= total_pages`.
///
/// # Errors
///
/// Any error from `fetch_page` aborts the walk and is returned unchanged;
/// items collected so far are dropped. Returns [`Error::PaginationError`] if
/// more than `max_pages` pages would be fetched, or if a page does not
/// advance past the page before it.
pub async fn walk_pages<T, F, Fut>(
    first: RecordList<T>,
    max_pages: u32,
    mut fetch_page: F,
) -> Result<Vec<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<RecordList<T>>>,
{
    let mut meta = first.pagination().clone();
    let mut items = first.into_items();
    let mut fetched: u32 = 1;

    while meta.has_next() {
        if fetched >= max_pages {
            return Err(Error::PaginationError(format!(
                "refusing to fetch more than {max_pages} pages (panel reports {} pages)",
                meta.total_pages
            )));
        }

        let next = meta.current_page + 1;
        debug!(page = next, total_pages = meta.total_pages, "fetching next page");

        let page = fetch_page(next).await?;
        let page_meta = page.pagination().clone();
        if page_meta.current_page <= meta.current_page {
            return Err(Error::PaginationError(format!(
                "requested page {next} but panel reported page {} after page {}",
                page_meta.current_page, meta.current_page
            )));
        }

        items.extend(page.into_items());
        meta = page_meta;
        fetched += 1;
    }

    debug!(pages = fetched, items = items.len(), "pagination complete");
    Ok(items)
}

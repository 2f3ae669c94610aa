//! Token-driven pagination
//!
//! Remote listings return one `Page` per call together with an optional
//! continuation token. `drain_pages` keeps calling until a page comes back
//! without a token.

use crate::error::RemoteError;
use std::future::Future;
use tracing::debug;

/// One page of a remote listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Token for the next page; `None` on the last page
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_token: Option<String>) -> Self {
        Self { items, next_token }
    }

    /// A final page with no continuation token
    pub fn last(items: Vec<T>) -> Self {
        Self::new(items, None)
    }
}

/// Fetch every page of a listing and concatenate the items in page order.
///
/// `fetch` receives `None` for the first page and then the previous page's
/// token. The first error aborts the listing; items gathered so far are
/// discarded.
pub async fn drain_pages<T, F, Fut>(mut fetch: F) -> Result<Vec<T>, RemoteError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, RemoteError>>,
{
    let mut items = Vec::new();
    let mut next_token = None;
    let mut pages = 0usize;

    loop {
        let page = fetch(next_token.take()).await?;
        pages += 1;
        items.extend(page.items);

        match page.next_token {
            Some(token) => next_token = Some(token),
            None => break,
        }
    }

    debug!(pages, items = items.len(), "Drained paginated listing");
    Ok(items)
}

//! Cursor-chained pagination over the board service.
//!
//! Every paged endpoint follows the same protocol: the first page is
//! requested without a cursor and carries the authoritative total, and each
//! following page is requested with `max` set to the id of the previous
//! page's last item. [`fetch_all`] drives that loop for any [`PageFetcher`].

use async_trait::async_trait;

use crate::result::Result;

/// One page of a paged collection plus the total the server claims.
#[derive(Debug)]
pub struct Page<T> {
    /// Items of this page, in server order.
    pub items: Vec<T>,
    /// Total number of items the server claims the collection has.
    pub total: usize,
}

/// An item that can serve as the cursor for the page after it.
pub trait PageItem {
    /// Identifier passed as the `max` query value of the next request.
    fn cursor(&self) -> &str;
}

/// Fetches a single page of a paged collection.
#[async_trait(?Send)]
pub trait PageFetcher {
    /// Item type of the collection.
    type Item: PageItem;

    /// Requests one page; `cursor` is `None` for the first page.
    ///
    /// # Errors
    ///
    /// Implementations surface transport errors and any terminal state the
    /// endpoint reports, such as a missing resource.
    async fn page(&self, cursor: Option<&str>) -> Result<Page<Self::Item>>;
}

/// Accumulates every page of `fetcher`'s collection.
///
/// Requests are strictly sequential: each cursor is the id of the previous
/// page's last item. The loop stops once a page comes back empty or the
/// accumulated length reaches the total claimed by the first reply. A
/// server that repeats a cursor duplicates items here; ids are not
/// deduplicated.
///
/// # Errors
///
/// Fails as soon as any page request fails.
pub async fn fetch_all<F>(fetcher: &F) -> Result<Vec<F::Item>>
where
    F: PageFetcher,
{
    let first = fetcher.page(None).await?;
    let total = first.total;
    let mut items = first.items;
    let mut page_len = items.len();

    while page_len > 0 && items.len() < total {
        let Some(last) = items.last() else { break };
        let cursor = last.cursor().to_string();

        let page = fetcher.page(Some(&cursor)).await?;
        page_len = page.items.len();
        items.extend(page.items);
    }

    Ok(items)
}

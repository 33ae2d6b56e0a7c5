//! Lazy paginated retrieval.
//!
//! A fetch is a single-pass stream: pages are requested only as items are
//! pulled, and polling a second stream for the same listing issues every
//! remote call again. Nothing is memoized.

use std::collections::VecDeque;
use std::sync::Arc;

use futures_util::stream::{self, BoxStream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::domain::{Entity, Limit, ListingQuery};
use crate::error::Result;
use crate::port::ContentClient;

/// Boxed stream of entities produced by a listing.
pub type EntityStream = BoxStream<'static, Result<Entity>>;

/// Pulls pages from a [`ContentClient`] until exhaustion or a limit.
#[derive(Clone)]
pub struct ListingFetcher {
    client: Arc<dyn ContentClient>,
    page_size: usize,
}

struct Cursor {
    client: Arc<dyn ContentClient>,
    query: ListingQuery,
    target: String,
    page_size: usize,
    limit: Limit,
    cancel: CancellationToken,
    after: Option<String>,
    buffered: VecDeque<Entity>,
    taken: usize,
    pages: usize,
    exhausted: bool,
}

impl ListingFetcher {
    /// `page_size` is clamped to at least one item per request.
    #[must_use]
    pub fn new(client: Arc<dyn ContentClient>, page_size: usize) -> Self {
        Self {
            client,
            page_size: page_size.max(1),
        }
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Stream at most `limit` items of `query`.
    ///
    /// `cancel` is checked before every page request; once it fires the
    /// stream ends cleanly after yielding whatever was already fetched.
    /// A failed page request yields one error and ends the stream.
    #[must_use]
    pub fn fetch(
        &self,
        query: ListingQuery,
        limit: Limit,
        cancel: CancellationToken,
    ) -> EntityStream {
        let target = describe(&query);
        let cursor = Cursor {
            client: self.client.clone(),
            query,
            target,
            page_size: self.page_size,
            limit,
            cancel,
            after: None,
            buffered: VecDeque::new(),
            taken: 0,
            pages: 0,
            exhausted: false,
        };

        stream::try_unfold(cursor, Cursor::advance).boxed()
    }
}

impl Cursor {
    async fn advance(mut self) -> Result<Option<(Entity, Self)>> {
        loop {
            if let Some(entity) = self.buffered.pop_front() {
                return Ok(Some((entity, self)));
            }
            if self.exhausted {
                return Ok(None);
            }
            if self.cancel.is_cancelled() {
                debug!(listing = %self.target, pages = self.pages, "Fetch cancelled");
                return Ok(None);
            }
            let request = match self.limit.remaining(self.taken) {
                Some(0) => return Ok(None),
                Some(remaining) => remaining.min(self.page_size),
                None => self.page_size,
            };
            self.next_page(request).await?;
        }
    }

    async fn next_page(&mut self, request: usize) -> Result<()> {
        let page = self
            .client
            .page(&self.query, self.after.as_deref(), request)
            .await
            .map_err(|e| e.for_target(self.target.clone()))?;

        let mut items = page.items;
        items.truncate(request);
        self.pages += 1;
        self.taken += items.len();
        self.exhausted = items.is_empty() || page.after.is_none();
        self.after = page.after;

        debug!(
            listing = %self.target,
            page = self.pages,
            items = items.len(),
            taken = self.taken,
            exhausted = self.exhausted,
            "Fetched page"
        );
        self.buffered.extend(items);
        Ok(())
    }
}

fn describe(query: &ListingQuery) -> String {
    match &query.subreddit {
        Some(sub) => format!("{} r/{sub}", query.listing),
        None => query.listing.to_string(),
    }
}

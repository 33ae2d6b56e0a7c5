//! Listing use case: resolve the target, fetch, filter.

use std::sync::Arc;

use futures_util::TryStreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::fetcher::{EntityStream, ListingFetcher};
use super::filter;
use crate::application::cache::{subreddit_key, EntityCache};
use crate::domain::{Entity, ListingRequest, Subreddit, SubredditName};
use crate::error::Result;
use crate::port::ContentClient;

/// Runs listing requests against the remote client.
///
/// Cheap to clone; clones share the client and cache.
#[derive(Clone)]
pub struct ListingService {
    client: Arc<dyn ContentClient>,
    cache: Arc<EntityCache>,
    fetcher: ListingFetcher,
}

impl ListingService {
    #[must_use]
    pub fn new(client: Arc<dyn ContentClient>, cache: Arc<EntityCache>, page_size: usize) -> Self {
        let fetcher = ListingFetcher::new(client.clone(), page_size);
        Self {
            client,
            cache,
            fetcher,
        }
    }

    /// Resolve a subreddit, consulting the cache first.
    ///
    /// # Errors
    ///
    /// Returns the remote lookup error tagged with `r/<name>`.
    pub async fn resolve_subreddit(&self, name: &SubredditName) -> Result<Subreddit> {
        let key = subreddit_key(name);
        match self.cache.get(&key) {
            Some(Entity::Subreddit(sub)) => {
                debug!(subreddit = %name, "Subreddit cache hit");
                return Ok(sub);
            }
            Some(_) | None => {}
        }

        let sub = self
            .client
            .subreddit(name)
            .await
            .map_err(|e| e.for_target(format!("r/{name}")))?;
        self.cache.put(key, Entity::Subreddit(sub.clone()));
        Ok(sub)
    }

    /// Open a lazy, filtered stream for `request`.
    ///
    /// The subreddit, if any, is resolved before the stream is returned.
    /// Each call opens a fresh stream that repeats every remote call.
    ///
    /// # Errors
    ///
    /// Fails only if target resolution fails; page errors arrive through
    /// the stream.
    pub async fn open(
        &self,
        request: &ListingRequest,
        cancel: CancellationToken,
    ) -> Result<EntityStream> {
        let mut query = request.query();
        if let Some(name) = &request.subreddit {
            let sub = self.resolve_subreddit(name).await?;
            query.subreddit =
                Some(SubredditName::parse(&sub.display_name).unwrap_or_else(|_| name.clone()));
        }
        let stream = self.fetcher.fetch(query, request.limit, cancel);
        Ok(filter::apply(stream, &request.filter))
    }

    /// Run `request` to completion and return every matching entity.
    ///
    /// # Errors
    ///
    /// Returns the first resolution or page error.
    pub async fn collect(&self, request: &ListingRequest) -> Result<Vec<Entity>> {
        info!(listing = %request.describe(), "Fetching listing");
        let items: Vec<Entity> = self
            .open(request, CancellationToken::new())
            .await?
            .try_collect()
            .await?;
        debug!(listing = %request.describe(), items = items.len(), "Listing complete");
        Ok(items)
    }

    #[must_use]
    pub fn cache(&self) -> &EntityCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FilterSpec, Limit, ListingKind, ModActionType};
    use crate::error::{Error, RemoteError};
    use crate::testkit::client::ScriptedClient;
    use crate::testkit::domain::{mod_action, posts};
    use std::sync::atomic::Ordering;

    fn request(
        listing: ListingKind,
        sub: &str,
        filter: FilterSpec,
        limit: Limit,
    ) -> ListingRequest {
        ListingRequest::new(listing, Some(sub.parse().unwrap()), filter, limit).unwrap()
    }

    #[tokio::test]
    async fn subreddit_is_resolved_once_per_session() {
        let client = Arc::new(
            ScriptedClient::new().with_listing(ListingKind::Unmoderated, posts(5, "alice")),
        );
        let service = ListingService::new(client.clone(), Arc::new(EntityCache::new()), 100);
        let req = request(
            ListingKind::Unmoderated,
            "r/rust",
            FilterSpec::default(),
            Limit::Unlimited,
        );

        assert_eq!(service.collect(&req).await.unwrap().len(), 5);
        assert_eq!(service.collect(&req).await.unwrap().len(), 5);
        assert_eq!(client.subreddit_calls().load(Ordering::SeqCst), 1);
        assert!(service.cache().contains("sub_rust"));
    }

    #[tokio::test]
    async fn unknown_subreddit_error_names_target() {
        let client = Arc::new(ScriptedClient::new());
        let service = ListingService::new(client.clone(), Arc::new(EntityCache::new()), 100);
        let req = request(
            ListingKind::ModQueue,
            "nope",
            FilterSpec::default(),
            Limit::AtMost(10),
        );

        let err = service.collect(&req).await.unwrap_err();
        assert_eq!(err.to_string(), "r/nope: subreddit not found: nope");
        assert!(matches!(
            err.root(),
            Error::Remote(RemoteError::NotFound { .. })
        ));
        assert_eq!(client.page_calls().load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn modlog_filters_are_sent_and_reapplied() {
        let client = Arc::new(ScriptedClient::new().with_listing(
            ListingKind::ModLog,
            vec![
                mod_action("a1", "mod_a", ModActionType::RemoveLink),
                mod_action("a2", "mod_b", ModActionType::RemoveLink),
                mod_action("a3", "mod_a", ModActionType::BanUser),
            ],
        ));
        let service = ListingService::new(client.clone(), Arc::new(EntityCache::new()), 100);
        let filter = FilterSpec::default()
            .with_moderators(["mod_a"])
            .with_action(ModActionType::RemoveLink);
        let req = request(ListingKind::ModLog, "rust", filter, Limit::AtMost(1000));

        let items = service.collect(&req).await.unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name(), "ModAction_a1");
        let sent = &client.page_requests()[0].query;
        assert_eq!(sent.action, Some(ModActionType::RemoveLink));
        assert_eq!(sent.moderators, vec!["mod_a".to_string()]);
    }
}

//! The session context.
//!
//! A [`Session`] owns everything that lives for one login: the client, the
//! entity cache and the job registry. Nothing is global; dropping the
//! session (after [`Session::stop`]) releases it all.

use std::sync::Arc;

use futures_util::TryStreamExt;
use tracing::{info, warn};

use super::cache::EntityCache;
use super::content::ContentService;
use super::job::{JobDrain, JobRegistry, JobScheduler, JobSnapshot, JobSpec};
use super::listing::ListingService;
use super::moderation::ModerationService;
use crate::domain::{
    Comment, Entity, Fullname, JobId, JobState, ListingRequest, Post, Subreddit, SubredditName,
    User, Username,
};
use crate::error::Result;
use crate::port::ContentClient;

/// An authenticated session.
pub struct Session {
    client: Arc<dyn ContentClient>,
    me: User,
    cache: Arc<EntityCache>,
    listings: ListingService,
    scheduler: JobScheduler,
    moderation: ModerationService,
    content: ContentService,
}

impl Session {
    /// Verify the client's identity and set up an empty cache and registry.
    ///
    /// # Errors
    ///
    /// Returns the remote error if the identity check fails.
    pub async fn start(client: Arc<dyn ContentClient>, page_size: usize) -> Result<Self> {
        let me = client.me().await?;
        let cache = Arc::new(EntityCache::new());
        let listings = ListingService::new(client.clone(), cache.clone(), page_size);
        let scheduler = JobScheduler::new(Arc::new(JobRegistry::new()));
        let moderation = ModerationService::new(client.clone(), listings.clone());
        let content = ContentService::new(client.clone(), listings.clone());

        info!(client = client.client_name(), user = %me.name, page_size, "Session started");
        Ok(Self {
            client,
            me,
            cache,
            listings,
            scheduler,
            moderation,
            content,
        })
    }

    /// Stop every live job and clear the cache. Returns the number of jobs
    /// that were asked to stop.
    pub fn stop(&self) -> usize {
        let stopped = self.scheduler.registry().stop_all();
        self.cache.clear();
        info!(stopped, "Session stopped");
        stopped
    }

    /// The authenticated user.
    #[must_use]
    pub fn me(&self) -> &User {
        &self.me
    }

    #[must_use]
    pub fn cache(&self) -> &EntityCache {
        &self.cache
    }

    #[must_use]
    pub fn moderation(&self) -> &ModerationService {
        &self.moderation
    }

    #[must_use]
    pub fn content(&self) -> &ContentService {
        &self.content
    }

    /// Run a listing in the foreground and return every matching item.
    ///
    /// # Errors
    ///
    /// Returns the first resolution or page error, tagged with its target.
    pub async fn listing(&self, request: &ListingRequest) -> Result<Vec<Entity>> {
        self.listings.collect(request).await
    }

    /// Run a listing as a background job.
    ///
    /// Never fails: a resolution or page error fails the job instead.
    pub fn submit_listing(&self, request: ListingRequest) -> JobId {
        let listings = self.listings.clone();
        let spec = JobSpec::listing(request.clone());
        self.scheduler.submit(spec, move |ctx| async move {
            let mut items = listings.open(&request, ctx.cancel_token()).await?;
            while let Some(entity) = items.try_next().await? {
                ctx.emit(entity);
            }
            Ok(())
        })
    }

    /// Look up a post by fullname.
    ///
    /// # Errors
    ///
    /// Returns the remote error tagged with the fullname.
    pub async fn post(&self, name: &Fullname) -> Result<Post> {
        self.client
            .post(name)
            .await
            .map_err(|e| e.for_target(name.to_string()))
    }

    /// Look up several posts as a background job.
    ///
    /// A failed lookup is recorded as an error item in the job's output and
    /// the job carries on with the next name.
    pub fn submit_post_lookup(&self, names: Vec<Fullname>) -> JobId {
        let client = self.client.clone();
        let command = names
            .iter()
            .map(Fullname::as_str)
            .collect::<Vec<_>>()
            .join(" ");
        let spec = JobSpec::new("post", format!("post {command}"));
        self.scheduler.submit(spec, move |ctx| async move {
            let cancel = ctx.cancel_token();
            for name in names {
                if cancel.is_cancelled() {
                    break;
                }
                match client.post(&name).await {
                    Ok(post) => ctx.emit(Entity::Post(post)),
                    Err(e) => {
                        let err = e.for_target(name.to_string());
                        warn!(job = %ctx.id(), error = %err, "Post lookup failed");
                        ctx.emit_error(&err);
                    }
                }
            }
            Ok(())
        })
    }

    /// Resolve a subreddit through the cache.
    ///
    /// # Errors
    ///
    /// Returns the remote error tagged with `r/<name>`.
    pub async fn subreddit(&self, name: &SubredditName) -> Result<Subreddit> {
        self.listings.resolve_subreddit(name).await
    }

    /// Look up a user.
    ///
    /// # Errors
    ///
    /// Returns the remote error tagged with `u/<name>`.
    pub async fn user(&self, name: &Username) -> Result<User> {
        self.client
            .user(name)
            .await
            .map_err(|e| e.for_target(format!("u/{name}")))
    }

    /// Look up a comment by fullname.
    ///
    /// # Errors
    ///
    /// Returns the remote error tagged with the fullname.
    pub async fn comment(&self, name: &Fullname) -> Result<Comment> {
        self.client
            .comment(name)
            .await
            .map_err(|e| e.for_target(name.to_string()))
    }

    /// Snapshot a job without blocking.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::NotFound`](crate::error::JobError::NotFound).
    pub fn poll(&self, id: JobId) -> Result<JobSnapshot> {
        self.scheduler.poll(id)
    }

    /// Snapshots of every registered job.
    #[must_use]
    pub fn jobs(&self) -> Vec<JobSnapshot> {
        self.scheduler.list()
    }

    /// Drain what a job appended since the last receive.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::NotFound`](crate::error::JobError::NotFound).
    pub fn receive(&self, id: JobId) -> Result<JobDrain> {
        self.scheduler.receive(id)
    }

    /// Wait for a job to finish.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::NotFound`](crate::error::JobError::NotFound).
    pub async fn wait(&self, id: JobId) -> Result<JobSnapshot> {
        self.scheduler.wait(id).await
    }

    /// Ask a job to stop.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::NotFound`](crate::error::JobError::NotFound).
    pub fn stop_job(&self, id: JobId) -> Result<JobState> {
        self.scheduler.stop(id)
    }

    /// Forget a finished job.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::NotFound`](crate::error::JobError::NotFound) or
    /// [`JobError::StillRunning`](crate::error::JobError::StillRunning).
    pub fn remove_job(&self, id: JobId) -> Result<JobSnapshot> {
        self.scheduler.remove(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::job::JobItem;
    use crate::domain::{FilterSpec, Limit, ListingKind};
    use crate::testkit::client::ScriptedClient;
    use crate::testkit::domain::{posts, raw_post};

    async fn session(client: ScriptedClient) -> Session {
        Session::start(Arc::new(client), 100).await.unwrap()
    }

    #[tokio::test]
    async fn start_records_identity() {
        let session = session(ScriptedClient::new()).await;
        assert_eq!(session.me().name, "modbot");
        assert!(session.jobs().is_empty());
    }

    #[tokio::test]
    async fn listing_job_is_pollable_immediately() {
        let client = ScriptedClient::new().with_listing(ListingKind::ModQueue, posts(4, "alice"));
        let session = session(client).await;
        let request = ListingRequest::new(
            ListingKind::ModQueue,
            Some("rust".parse().unwrap()),
            FilterSpec::default(),
            Limit::Unlimited,
        )
        .unwrap();

        let id = session.submit_listing(request);
        let first = session.poll(id).unwrap();
        assert_eq!(first.name, "modqueue");
        assert_eq!(first.command, "modqueue r/rust limit=unlimited");

        let done = session.wait(id).await.unwrap();
        assert_eq!(done.state, JobState::Completed);
        assert_eq!(done.output.len(), 4);
    }

    #[tokio::test]
    async fn post_lookup_records_misses_as_items() {
        let client = ScriptedClient::new().with_post(raw_post("p1", "alice", "example.com"));
        let session = session(client).await;

        let id = session.submit_post_lookup(vec![
            Fullname::new("t3_p1"),
            Fullname::new("t3_missing"),
        ]);
        let snap = session.wait(id).await.unwrap();

        assert_eq!(snap.state, JobState::Completed);
        assert!(snap.errors.is_empty());
        assert!(matches!(snap.output[0], JobItem::Entity(Entity::Post(_))));
        match &snap.output[1] {
            JobItem::Error(failure) => assert_eq!(failure.target.as_deref(), Some("t3_missing")),
            other => panic!("expected an error item, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn stop_clears_cache() {
        let session = session(ScriptedClient::new()).await;
        session
            .subreddit(&SubredditName::parse("rust").unwrap())
            .await
            .unwrap();
        assert_eq!(session.cache().len(), 1);

        session.stop();
        assert!(session.cache().is_empty());
    }

    #[tokio::test]
    async fn user_error_names_target() {
        let session = session(ScriptedClient::new()).await;
        let err = session
            .user(&Username::parse("ghost").unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "u/ghost: user not found: ghost");
    }
}

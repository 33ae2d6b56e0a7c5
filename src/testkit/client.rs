//! In-memory [`ContentClient`] for testing.
//!
//! [`ScriptedClient`] serves listings from pre-loaded vectors, paging them
//! with numeric cursors, and records every call so tests can assert what
//! was asked of the remote side. Failures, panics and a page gate can be
//! scripted for exercising job failure and stop paths.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Semaphore;

use crate::domain::{
    Comment, Distinguish, Entity, Fullname, ListingKind, ListingQuery, Post, Subreddit,
    SubredditName, User, Username,
};
use crate::error::{RemoteError, Result};
use crate::port::{BanRequest, ContentClient, NewPost, Page};

use super::domain::{raw_user, subreddit};

/// One recorded `page` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub query: ListingQuery,
    pub cursor: Option<String>,
    pub limit: usize,
}

/// A scripted content client.
pub struct ScriptedClient {
    me: User,
    subreddits: HashMap<String, Subreddit>,
    listings: HashMap<ListingKind, Vec<Entity>>,
    posts: HashMap<String, Post>,
    comments: HashMap<String, Comment>,
    users: HashMap<String, User>,
    page_failure: Mutex<Option<(u32, RemoteError)>>,
    panic_on_page: Option<u32>,
    gate: Option<Arc<Semaphore>>,
    page_calls: Arc<AtomicU32>,
    subreddit_calls: Arc<AtomicU32>,
    requests: Mutex<Vec<PageRequest>>,
    actions: Mutex<Vec<String>>,
}

impl ScriptedClient {
    /// A client logged in as `modbot` that knows the `rust` subreddit.
    pub fn new() -> Self {
        let mut subreddits = HashMap::new();
        subreddits.insert("rust".to_string(), subreddit("rust"));
        Self {
            me: raw_user("modbot"),
            subreddits,
            listings: HashMap::new(),
            posts: HashMap::new(),
            comments: HashMap::new(),
            users: HashMap::new(),
            page_failure: Mutex::new(None),
            panic_on_page: None,
            gate: None,
            page_calls: Arc::new(AtomicU32::new(0)),
            subreddit_calls: Arc::new(AtomicU32::new(0)),
            requests: Mutex::new(Vec::new()),
            actions: Mutex::new(Vec::new()),
        }
    }

    /// Serve `items` for every query against `listing`.
    pub fn with_listing(mut self, listing: ListingKind, items: Vec<Entity>) -> Self {
        self.listings.insert(listing, items);
        self
    }

    pub fn with_subreddit(mut self, sub: Subreddit) -> Self {
        self.subreddits.insert(sub.display_name.clone(), sub);
        self
    }

    pub fn with_post(mut self, post: Post) -> Self {
        self.posts.insert(post.name.as_str().to_string(), post);
        self
    }

    pub fn with_comment(mut self, comment: Comment) -> Self {
        self.comments.insert(comment.name.as_str().to_string(), comment);
        self
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.users.insert(user.name.clone(), user);
        self
    }

    /// Fail the `n`th page call (zero-based) with `error`.
    pub fn fail_page(self, n: u32, error: RemoteError) -> Self {
        *self.page_failure.lock() = Some((n, error));
        self
    }

    /// Panic inside the `n`th page call (zero-based).
    pub fn panic_on_page(mut self, n: u32) -> Self {
        self.panic_on_page = Some(n);
        self
    }

    /// Make every page call take one permit from `gate` first.
    pub fn with_page_gate(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Shared counter of `page` calls.
    pub fn page_calls(&self) -> Arc<AtomicU32> {
        self.page_calls.clone()
    }

    /// Shared counter of `subreddit` lookups.
    pub fn subreddit_calls(&self) -> Arc<AtomicU32> {
        self.subreddit_calls.clone()
    }

    /// Every `page` call so far, in order.
    pub fn page_requests(&self) -> Vec<PageRequest> {
        self.requests.lock().clone()
    }

    /// Mutations performed so far, one `verb target` line each.
    pub fn actions(&self) -> Vec<String> {
        self.actions.lock().clone()
    }

    fn record(&self, action: String) {
        self.actions.lock().push(action);
    }

    fn not_found(kind: &'static str, name: &str) -> crate::error::Error {
        RemoteError::NotFound {
            kind,
            name: name.to_string(),
        }
        .into()
    }
}

impl Default for ScriptedClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentClient for ScriptedClient {
    async fn me(&self) -> Result<User> {
        Ok(self.me.clone())
    }

    async fn subreddit(&self, name: &SubredditName) -> Result<Subreddit> {
        self.subreddit_calls.fetch_add(1, Ordering::SeqCst);
        self.subreddits
            .get(name.as_str())
            .cloned()
            .ok_or_else(|| Self::not_found("subreddit", name.as_str()))
    }

    async fn user(&self, name: &Username) -> Result<User> {
        if name.as_str() == self.me.name {
            return Ok(self.me.clone());
        }
        self.users
            .get(name.as_str())
            .cloned()
            .ok_or_else(|| Self::not_found("user", name.as_str()))
    }

    async fn post(&self, name: &Fullname) -> Result<Post> {
        self.posts
            .get(name.as_str())
            .cloned()
            .ok_or_else(|| Self::not_found("post", name.as_str()))
    }

    async fn comment(&self, name: &Fullname) -> Result<Comment> {
        self.comments
            .get(name.as_str())
            .cloned()
            .ok_or_else(|| Self::not_found("comment", name.as_str()))
    }

    async fn page(
        &self,
        query: &ListingQuery,
        cursor: Option<&str>,
        limit: usize,
    ) -> Result<Page> {
        if let Some(gate) = &self.gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }

        let call = self.page_calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(PageRequest {
            query: query.clone(),
            cursor: cursor.map(str::to_string),
            limit,
        });

        if self.panic_on_page == Some(call) {
            panic!("scripted panic on page {call}");
        }
        {
            let mut failure = self.page_failure.lock();
            if failure.as_ref().is_some_and(|(n, _)| *n == call) {
                if let Some((_, error)) = failure.take() {
                    return Err(error.into());
                }
            }
        }

        let items = self.listings.get(&query.listing).map_or(&[][..], Vec::as_slice);
        let start = cursor.and_then(|c| c.parse::<usize>().ok()).unwrap_or(0);
        let start = start.min(items.len());
        let end = start.saturating_add(limit).min(items.len());
        let page = items[start..end].to_vec();

        Ok(if end < items.len() {
            Page::with_next(page, end.to_string())
        } else {
            Page::last(page)
        })
    }

    async fn approve(&self, target: &Fullname) -> Result<()> {
        self.record(format!("approve {target}"));
        Ok(())
    }

    async fn remove(&self, target: &Fullname, spam: bool) -> Result<()> {
        let verb = if spam { "spam" } else { "remove" };
        self.record(format!("{verb} {target}"));
        Ok(())
    }

    async fn distinguish(&self, target: &Fullname, how: Distinguish) -> Result<()> {
        self.record(format!("distinguish {target} {}", how.as_str()));
        Ok(())
    }

    async fn set_flair(
        &self,
        subreddit: &SubredditName,
        post: &Fullname,
        text: &str,
        css_class: &str,
    ) -> Result<()> {
        self.record(format!("flair r/{subreddit} {post} {text:?} {css_class:?}"));
        Ok(())
    }

    async fn ban(&self, subreddit: &SubredditName, request: &BanRequest) -> Result<()> {
        let duration = request
            .duration_days
            .map_or_else(|| "permanent".to_string(), |d| format!("{d}d"));
        self.record(format!("ban r/{subreddit} u/{} {duration}", request.user));
        Ok(())
    }

    async fn unban(&self, subreddit: &SubredditName, user: &Username) -> Result<()> {
        self.record(format!("unban r/{subreddit} u/{user}"));
        Ok(())
    }

    async fn reply(&self, parent: &Fullname, text: &str) -> Result<Comment> {
        self.record(format!("reply {parent}"));
        let mut comment = super::domain::raw_comment("reply", &self.me.name);
        comment.body = text.to_string();
        comment.parent_id = parent.clone();
        Ok(comment)
    }

    async fn edit(&self, target: &Fullname, _text: &str) -> Result<()> {
        self.record(format!("edit {target}"));
        Ok(())
    }

    async fn submit(&self, post: &NewPost) -> Result<Fullname> {
        self.record(format!("submit r/{} {}", post.subreddit, post.title));
        Ok(Fullname::from_parts("t3", "new"))
    }

    async fn compose(&self, to: &Username, subject: &str, _body: &str) -> Result<()> {
        self.record(format!("compose u/{to} {subject}"));
        Ok(())
    }

    fn client_name(&self) -> &'static str {
        "scripted"
    }
}

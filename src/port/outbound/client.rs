//! Content API port.
//!
//! The remote API is consumed through [`ContentClient`]: named lookups, one
//! page of a listing at a time, and one-shot mutations. Authentication,
//! transport and wire format stay behind this trait.

use async_trait::async_trait;

use crate::domain::{
    Comment, Distinguish, Entity, Fullname, ListingQuery, Post, Subreddit, SubredditName,
    User, Username,
};
use crate::error::Result;

/// One page of a listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Items in remote order.
    pub items: Vec<Entity>,
    /// Cursor for the next page; `None` means the listing is exhausted.
    pub after: Option<String>,
}

impl Page {
    /// A final page.
    #[must_use]
    pub fn last(items: Vec<Entity>) -> Self {
        Self { items, after: None }
    }

    /// A page followed by more.
    #[must_use]
    pub fn with_next(items: Vec<Entity>, after: impl Into<String>) -> Self {
        Self {
            items,
            after: Some(after.into()),
        }
    }
}

/// Ban parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanRequest {
    pub user: Username,
    /// Moderator note, not shown to the user.
    pub note: String,
    /// Reason shown to the user.
    pub reason: Option<String>,
    /// `None` means permanent.
    pub duration_days: Option<u32>,
    /// Message sent to the user.
    pub message: Option<String>,
}

/// A new link or self post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub subreddit: SubredditName,
    pub title: String,
    pub body: PostBody,
}

/// Body of a new post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostBody {
    Link(String),
    Text(String),
}

/// Client for the remote content API.
#[async_trait]
pub trait ContentClient: Send + Sync {
    /// The account this client is authenticated as.
    async fn me(&self) -> Result<User>;

    /// Look up a subreddit by name.
    async fn subreddit(&self, name: &SubredditName) -> Result<Subreddit>;

    /// Look up a user by name.
    async fn user(&self, name: &Username) -> Result<User>;

    /// Look up a post by fullname.
    async fn post(&self, name: &Fullname) -> Result<Post>;

    /// Look up a comment by fullname.
    async fn comment(&self, name: &Fullname) -> Result<Comment>;

    /// Fetch one page of a listing.
    ///
    /// `cursor` is the previous page's `after`; `limit` caps the page size.
    async fn page(&self, query: &ListingQuery, cursor: Option<&str>, limit: usize)
        -> Result<Page>;

    async fn approve(&self, target: &Fullname) -> Result<()>;

    async fn remove(&self, target: &Fullname, spam: bool) -> Result<()>;

    async fn distinguish(&self, target: &Fullname, how: Distinguish) -> Result<()>;

    async fn set_flair(
        &self,
        subreddit: &SubredditName,
        post: &Fullname,
        text: &str,
        css_class: &str,
    ) -> Result<()>;

    async fn ban(&self, subreddit: &SubredditName, request: &BanRequest) -> Result<()>;

    async fn unban(&self, subreddit: &SubredditName, user: &Username) -> Result<()>;

    /// Reply to a post, comment or message. Returns the new comment.
    async fn reply(&self, parent: &Fullname, text: &str) -> Result<Comment>;

    /// Replace the text of a self post or comment.
    async fn edit(&self, target: &Fullname, text: &str) -> Result<()>;

    /// Submit a new post, returning its fullname.
    async fn submit(&self, post: &NewPost) -> Result<Fullname>;

    /// Send a private message.
    async fn compose(&self, to: &Username, subject: &str, body: &str) -> Result<()>;

    /// Client name for logging/debugging.
    fn client_name(&self) -> &'static str;
}

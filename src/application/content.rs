//! Creating and editing content.

use std::sync::Arc;

use tracing::info;

use crate::application::listing::ListingService;
use crate::domain::error::DomainError;
use crate::domain::{Comment, Entity, EntityKind, Fullname, SubredditName, Username};
use crate::error::{Error, Result};
use crate::port::{ContentClient, NewPost};

/// Replies, edits, submissions and private messages.
#[derive(Clone)]
pub struct ContentService {
    client: Arc<dyn ContentClient>,
    listings: ListingService,
}

impl ContentService {
    #[must_use]
    pub fn new(client: Arc<dyn ContentClient>, listings: ListingService) -> Self {
        Self { client, listings }
    }

    /// Reply to a post, comment or message.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnsupportedTarget`] for other fullnames, or the
    /// remote error tagged with `parent`.
    pub async fn reply(&self, parent: &Fullname, text: &str) -> Result<Comment> {
        require_kind(
            parent,
            "reply to",
            &[EntityKind::Post, EntityKind::Comment, EntityKind::Message],
        )?;
        let comment = self
            .client
            .reply(parent, text)
            .await
            .map_err(|e| e.for_target(parent.to_string()))?;
        info!(parent = %parent, comment = %comment.name, "Reply posted");
        Ok(comment)
    }

    /// Replace the body of a self post or comment.
    ///
    /// Returns the entity with its text updated locally.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnsupportedTarget`] for other fullnames and
    /// link posts, or the remote error tagged with `target`.
    pub async fn edit(&self, target: &Fullname, text: &str) -> Result<Entity> {
        require_kind(target, "edit", &[EntityKind::Post, EntityKind::Comment])?;
        let tag = |e: Error| e.for_target(target.to_string());

        let edited = match target.kind() {
            Some(EntityKind::Comment) => {
                let mut comment = self.client.comment(target).await.map_err(tag)?;
                comment.body = text.to_string();
                Entity::Comment(comment)
            }
            _ => {
                let mut post = self.client.post(target).await.map_err(tag)?;
                if !post.is_self {
                    return Err(DomainError::UnsupportedTarget {
                        action: "edit",
                        kind: EntityKind::Post,
                    }
                    .into());
                }
                post.selftext = text.to_string();
                Entity::Post(post)
            }
        };
        self.client.edit(target, text).await.map_err(tag)?;
        info!(target = %target, "Edited");
        Ok(edited)
    }

    /// Submit a post after checking its subreddit exists.
    ///
    /// # Errors
    ///
    /// Returns the subreddit resolution error or the remote submit error.
    pub async fn submit(&self, post: &NewPost) -> Result<Fullname> {
        let sub = self.listings.resolve_subreddit(&post.subreddit).await?;
        let mut post = post.clone();
        post.subreddit = SubredditName::parse(&sub.display_name).unwrap_or(post.subreddit);
        let name = self
            .client
            .submit(&post)
            .await
            .map_err(|e| e.for_target(format!("r/{}", post.subreddit)))?;
        info!(subreddit = %post.subreddit, post = %name, "Post submitted");
        Ok(name)
    }

    /// Send a private message.
    ///
    /// # Errors
    ///
    /// Returns the remote error tagged with the recipient.
    pub async fn compose(&self, to: &Username, subject: &str, body: &str) -> Result<()> {
        self.client
            .compose(to, subject, body)
            .await
            .map_err(|e| e.for_target(format!("u/{to}")))?;
        info!(to = %to, "Message sent");
        Ok(())
    }
}

fn require_kind(name: &Fullname, action: &'static str, allowed: &[EntityKind]) -> Result<()> {
    match name.kind() {
        Some(kind) if allowed.contains(&kind) => Ok(()),
        Some(kind) => Err(DomainError::UnsupportedTarget { action, kind }.into()),
        None => Err(DomainError::UnknownValue {
            field: "fullname",
            value: name.to_string(),
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::cache::EntityCache;
    use crate::port::PostBody;
    use crate::testkit::client::ScriptedClient;
    use crate::testkit::domain::raw_comment;

    fn service(client: Arc<ScriptedClient>) -> ContentService {
        let listings = ListingService::new(client.clone(), Arc::new(EntityCache::new()), 100);
        ContentService::new(client, listings)
    }

    #[tokio::test]
    async fn reply_returns_new_comment() {
        let client = Arc::new(ScriptedClient::new());
        let comment = service(client.clone())
            .reply(&Fullname::new("t4_m1"), "thanks")
            .await
            .unwrap();
        assert_eq!(comment.body, "thanks");
        assert_eq!(comment.parent_id.as_str(), "t4_m1");
        assert_eq!(client.actions(), vec!["reply t4_m1"]);
    }

    #[tokio::test]
    async fn edit_returns_comment_with_new_body() {
        let client = Arc::new(ScriptedClient::new().with_comment(raw_comment("c1", "modbot")));
        let edited = service(client.clone())
            .edit(&Fullname::new("t1_c1"), "updated")
            .await
            .unwrap();
        match edited {
            Entity::Comment(comment) => assert_eq!(comment.body, "updated"),
            other => panic!("expected a comment, got {other:?}"),
        }
        assert_eq!(client.actions(), vec!["edit t1_c1"]);
    }

    #[tokio::test]
    async fn editing_a_user_is_rejected() {
        let err = service(Arc::new(ScriptedClient::new()))
            .edit(&Fullname::new("t2_alice"), "x")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "cannot edit a user");
    }

    #[tokio::test]
    async fn submit_to_unknown_subreddit_fails_before_posting() {
        let client = Arc::new(ScriptedClient::new());
        let post = NewPost {
            subreddit: SubredditName::parse("nope").unwrap(),
            title: "hello".into(),
            body: PostBody::Text("body".into()),
        };
        assert!(service(client.clone()).submit(&post).await.is_err());
        assert!(client.actions().is_empty());
    }

    #[tokio::test]
    async fn compose_reaches_client() {
        let client = Arc::new(ScriptedClient::new());
        service(client.clone())
            .compose(&Username::parse("/u/alice").unwrap(), "hi", "body")
            .await
            .unwrap();
        assert_eq!(client.actions(), vec!["compose u/alice hi"]);
    }
}

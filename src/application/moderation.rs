//! One-shot moderator actions.

use std::sync::Arc;

use tracing::info;

use crate::application::listing::ListingService;
use crate::domain::error::DomainError;
use crate::domain::{
    Comment, Distinguish, Entity, EntityKind, Fullname, Post, SubredditName, Username,
};
use crate::error::Result;
use crate::port::{BanRequest, ContentClient};

/// An action aimed at a single post or comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModerationAction {
    Approve,
    Remove { spam: bool },
    Distinguish(Distinguish),
    /// Posts only.
    Flair { text: String, css_class: String },
    /// Posts only.
    Unflair,
}

impl ModerationAction {
    /// Verb used in logs and errors.
    #[must_use]
    pub const fn verb(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Remove { spam: false } => "remove",
            Self::Remove { spam: true } => "spam",
            Self::Distinguish(_) => "distinguish",
            Self::Flair { .. } => "flair",
            Self::Unflair => "unflair",
        }
    }
}

/// Moderator actions against posts, comments and users.
#[derive(Clone)]
pub struct ModerationService {
    client: Arc<dyn ContentClient>,
    listings: ListingService,
}

impl ModerationService {
    #[must_use]
    pub fn new(client: Arc<dyn ContentClient>, listings: ListingService) -> Self {
        Self { client, listings }
    }

    /// Fetch the post or comment behind `name`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnsupportedTarget`] for fullnames of any other
    /// kind, or the remote lookup error tagged with `name`.
    pub async fn resolve(&self, name: &Fullname, action: &ModerationAction) -> Result<Entity> {
        let entity = match name.kind() {
            Some(EntityKind::Post) => self.client.post(name).await.map(Entity::Post),
            Some(EntityKind::Comment) => self.client.comment(name).await.map(Entity::Comment),
            Some(kind) => {
                return Err(DomainError::UnsupportedTarget {
                    action: action.verb(),
                    kind,
                }
                .into())
            }
            None => {
                return Err(DomainError::UnknownValue {
                    field: "fullname",
                    value: name.to_string(),
                }
                .into())
            }
        };
        entity.map_err(|e| e.for_target(name.to_string()))
    }

    /// Look up `name` and apply `action` to it.
    ///
    /// # Errors
    ///
    /// See [`resolve`](Self::resolve) and [`apply`](Self::apply).
    pub async fn invoke(&self, name: &Fullname, action: &ModerationAction) -> Result<Entity> {
        let target = self.resolve(name, action).await?;
        self.apply(&target, action).await?;
        Ok(target)
    }

    /// Apply `action` to an already fetched entity.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnsupportedTarget`] when the entity kind cannot
    /// take the action (flair on a comment, anything on a user), or the
    /// remote error tagged with the entity's name.
    pub async fn apply(&self, target: &Entity, action: &ModerationAction) -> Result<()> {
        let label = target.name().to_string();
        let result = match (action, target) {
            (ModerationAction::Approve, Entity::Post(Post { name, .. }))
            | (ModerationAction::Approve, Entity::Comment(Comment { name, .. })) => {
                self.client.approve(name).await
            }
            (ModerationAction::Remove { spam }, Entity::Post(Post { name, .. }))
            | (ModerationAction::Remove { spam }, Entity::Comment(Comment { name, .. })) => {
                self.client.remove(name, *spam).await
            }
            (ModerationAction::Distinguish(how), Entity::Post(Post { name, .. }))
            | (ModerationAction::Distinguish(how), Entity::Comment(Comment { name, .. })) => {
                self.client.distinguish(name, *how).await
            }
            (ModerationAction::Flair { text, css_class }, Entity::Post(post)) => {
                let sub = SubredditName::parse(&post.subreddit)?;
                self.client.set_flair(&sub, &post.name, text, css_class).await
            }
            (ModerationAction::Unflair, Entity::Post(post)) => {
                let sub = SubredditName::parse(&post.subreddit)?;
                self.client.set_flair(&sub, &post.name, "", "").await
            }
            (_, other) => {
                return Err(DomainError::UnsupportedTarget {
                    action: action.verb(),
                    kind: other.kind(),
                }
                .into())
            }
        };
        result.map_err(|e| e.for_target(label.clone()))?;
        info!(action = action.verb(), target = %label, "Moderator action applied");
        Ok(())
    }

    /// Ban a user from a subreddit.
    ///
    /// # Errors
    ///
    /// Returns the subreddit resolution error or the remote error tagged
    /// with the user.
    pub async fn ban(&self, subreddit: &SubredditName, request: &BanRequest) -> Result<()> {
        let sub = self.canonical(subreddit).await?;
        self.client
            .ban(&sub, request)
            .await
            .map_err(|e| e.for_target(format!("u/{}", request.user)))?;
        info!(subreddit = %sub, user = %request.user, days = ?request.duration_days, "User banned");
        Ok(())
    }

    /// Lift a ban.
    ///
    /// # Errors
    ///
    /// Returns the subreddit resolution error or the remote error tagged
    /// with the user.
    pub async fn unban(&self, subreddit: &SubredditName, user: &Username) -> Result<()> {
        let sub = self.canonical(subreddit).await?;
        self.client
            .unban(&sub, user)
            .await
            .map_err(|e| e.for_target(format!("u/{user}")))?;
        info!(subreddit = %sub, user = %user, "User unbanned");
        Ok(())
    }

    async fn canonical(&self, subreddit: &SubredditName) -> Result<SubredditName> {
        let sub = self.listings.resolve_subreddit(subreddit).await?;
        Ok(SubredditName::parse(&sub.display_name).unwrap_or_else(|_| subreddit.clone()))
    }
}

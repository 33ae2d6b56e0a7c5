//! Filter specifications over entities.
//!
//! Every dimension is optional. An absent dimension passes everything; a
//! present one requires an exact match; present dimensions combine with AND.
//! A dimension only knows how to read certain entity kinds (domain is a
//! post field, moderator is a mod-log field). Entities of any other kind are
//! dropped while that dimension is active, never reported as errors.

use std::collections::BTreeSet;

use serde::Serialize;

use super::action::ModActionType;
use super::entity::Entity;

/// Restrict a mixed listing to posts or comments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KindFilter {
    #[default]
    All,
    Posts,
    Comments,
}

/// Optional match dimensions narrowing a sequence of entities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSpec {
    pub authors: Option<BTreeSet<String>>,
    pub subreddits: Option<BTreeSet<String>>,
    pub domain: Option<String>,
    pub moderators: Option<BTreeSet<String>>,
    pub action: Option<ModActionType>,
    pub kind: KindFilter,
    pub unread_only: bool,
}

impl FilterSpec {
    /// True when no dimension is set, so every entity passes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.authors.is_none()
            && self.subreddits.is_none()
            && self.domain.is_none()
            && self.moderators.is_none()
            && self.action.is_none()
            && self.kind == KindFilter::All
            && !self.unread_only
    }

    /// Builder: restrict to these authors.
    #[must_use]
    pub fn with_authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authors = Some(authors.into_iter().map(Into::into).collect());
        self
    }

    /// Builder: restrict to these subreddits.
    #[must_use]
    pub fn with_subreddits<I, S>(mut self, subreddits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subreddits = Some(subreddits.into_iter().map(Into::into).collect());
        self
    }

    /// Builder: restrict posts to one link domain.
    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Builder: restrict mod-log entries to these moderators.
    #[must_use]
    pub fn with_moderators<I, S>(mut self, moderators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.moderators = Some(moderators.into_iter().map(Into::into).collect());
        self
    }

    /// Builder: restrict mod-log entries to one action type.
    #[must_use]
    pub const fn with_action(mut self, action: ModActionType) -> Self {
        self.action = Some(action);
        self
    }

    /// Builder: restrict to posts or comments.
    #[must_use]
    pub const fn with_kind(mut self, kind: KindFilter) -> Self {
        self.kind = kind;
        self
    }

    /// Builder: keep only unread messages.
    #[must_use]
    pub const fn unread(mut self) -> Self {
        self.unread_only = true;
        self
    }

    /// Whether `entity` passes every active dimension.
    #[must_use]
    pub fn matches(&self, entity: &Entity) -> bool {
        self.matches_kind(entity)
            && self.matches_authors(entity)
            && self.matches_subreddits(entity)
            && self.matches_domain(entity)
            && self.matches_moderators(entity)
            && self.matches_action(entity)
            && self.matches_unread(entity)
    }

    fn matches_kind(&self, entity: &Entity) -> bool {
        match (self.kind, entity) {
            (KindFilter::All, _) => true,
            (KindFilter::Posts, Entity::Post(_)) => true,
            (KindFilter::Comments, Entity::Comment(_)) => true,
            (KindFilter::Posts | KindFilter::Comments, _) => false,
        }
    }

    fn matches_authors(&self, entity: &Entity) -> bool {
        let Some(authors) = &self.authors else {
            return true;
        };
        let author = match entity {
            Entity::Post(p) => &p.author,
            Entity::Comment(c) => &c.author,
            Entity::Message(m) => &m.author,
            Entity::User(_) | Entity::Subreddit(_) | Entity::ModAction(_) => return false,
        };
        authors.contains(author)
    }

    fn matches_subreddits(&self, entity: &Entity) -> bool {
        let Some(subreddits) = &self.subreddits else {
            return true;
        };
        let subreddit = match entity {
            Entity::Post(p) => Some(&p.subreddit),
            Entity::Comment(c) => Some(&c.subreddit),
            Entity::Message(m) => m.subreddit.as_ref(),
            Entity::ModAction(a) => Some(&a.subreddit),
            Entity::User(_) | Entity::Subreddit(_) => return false,
        };
        subreddit.is_some_and(|s| subreddits.contains(s))
    }

    fn matches_domain(&self, entity: &Entity) -> bool {
        let Some(domain) = &self.domain else {
            return true;
        };
        match entity {
            Entity::Post(p) => &p.domain == domain,
            Entity::Comment(_)
            | Entity::Message(_)
            | Entity::User(_)
            | Entity::Subreddit(_)
            | Entity::ModAction(_) => false,
        }
    }

    fn matches_moderators(&self, entity: &Entity) -> bool {
        let Some(moderators) = &self.moderators else {
            return true;
        };
        match entity {
            Entity::ModAction(a) => moderators.contains(&a.moderator),
            Entity::Post(_)
            | Entity::Comment(_)
            | Entity::Message(_)
            | Entity::User(_)
            | Entity::Subreddit(_) => false,
        }
    }

    fn matches_action(&self, entity: &Entity) -> bool {
        let Some(action) = self.action else {
            return true;
        };
        match entity {
            Entity::ModAction(a) => a.action == action,
            Entity::Post(_)
            | Entity::Comment(_)
            | Entity::Message(_)
            | Entity::User(_)
            | Entity::Subreddit(_) => false,
        }
    }

    fn matches_unread(&self, entity: &Entity) -> bool {
        if !self.unread_only {
            return true;
        }
        match entity {
            Entity::Message(m) => m.unread,
            Entity::Post(_)
            | Entity::Comment(_)
            | Entity::User(_)
            | Entity::Subreddit(_)
            | Entity::ModAction(_) => false,
        }
    }
}

//! Listing sources, limits and requests.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::action::ModActionType;
use super::error::DomainError;
use super::filter::{FilterSpec, KindFilter};
use super::id::SubredditName;

/// Sort order for a subreddit's post listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PostSort {
    Hot,
    New,
    Rising,
    Controversial,
    Top,
}

impl PostSort {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hot => "hot",
            Self::New => "new",
            Self::Rising => "rising",
            Self::Controversial => "controversial",
            Self::Top => "top",
        }
    }
}

impl FromStr for PostSort {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hot" => Ok(Self::Hot),
            "new" => Ok(Self::New),
            "rising" => Ok(Self::Rising),
            "controversial" => Ok(Self::Controversial),
            "top" => Ok(Self::Top),
            _ => Err(DomainError::UnknownValue {
                field: "sort",
                value: s.to_string(),
            }),
        }
    }
}

/// A remote, page-oriented source of entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingKind {
    ModQueue,
    Unmoderated,
    ModLog,
    Posts(PostSort),
    Inbox,
    Unread,
    Modmail,
}

impl ListingKind {
    /// Whether the listing is scoped to a subreddit.
    #[must_use]
    pub const fn needs_subreddit(self) -> bool {
        matches!(
            self,
            Self::ModQueue | Self::Unmoderated | Self::ModLog | Self::Posts(_)
        )
    }

    /// Verb name used for job names and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ModQueue => "modqueue",
            Self::Unmoderated => "unmoderated",
            Self::ModLog => "modlog",
            Self::Posts(_) => "posts",
            Self::Inbox => "inbox",
            Self::Unread => "unread",
            Self::Modmail => "modmail",
        }
    }
}

impl fmt::Display for ListingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Posts(sort) => write!(f, "posts/{}", sort.as_str()),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Upper bound on the number of items fetched from a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Limit {
    /// Fetch until the source is exhausted.
    Unlimited,
    /// Fetch at most this many items.
    AtMost(usize),
}

impl Limit {
    /// Interpret a raw shell-style limit: negative means unlimited.
    #[must_use]
    pub fn from_raw(raw: i64) -> Self {
        usize::try_from(raw).map_or(Self::Unlimited, Self::AtMost)
    }

    /// Items still allowed after `taken` have been fetched.
    #[must_use]
    pub fn remaining(self, taken: usize) -> Option<usize> {
        match self {
            Self::Unlimited => None,
            Self::AtMost(max) => Some(max.saturating_sub(taken)),
        }
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unlimited => f.write_str("unlimited"),
            Self::AtMost(n) => write!(f, "{n}"),
        }
    }
}

/// What the remote client is asked for, including server-side narrowing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub listing: ListingKind,
    pub subreddit: Option<SubredditName>,
    /// Mod log only: restrict to one action type.
    pub action: Option<ModActionType>,
    /// Mod log only: restrict to these moderators.
    pub moderators: Vec<String>,
    /// Mod queue only: posts or comments.
    pub only: KindFilter,
}

impl ListingQuery {
    /// A query with no server-side narrowing.
    #[must_use]
    pub fn new(listing: ListingKind, subreddit: Option<SubredditName>) -> Self {
        Self {
            listing,
            subreddit,
            action: None,
            moderators: Vec::new(),
            only: KindFilter::All,
        }
    }
}

/// A complete request for a filtered listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingRequest {
    pub listing: ListingKind,
    pub subreddit: Option<SubredditName>,
    pub filter: FilterSpec,
    pub limit: Limit,
}

impl ListingRequest {
    /// Build a request, checking that subreddit-scoped listings have a target.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MissingSubreddit`] when the listing is
    /// subreddit-scoped and none was given.
    pub fn new(
        listing: ListingKind,
        subreddit: Option<SubredditName>,
        filter: FilterSpec,
        limit: Limit,
    ) -> Result<Self, DomainError> {
        if listing.needs_subreddit() && subreddit.is_none() {
            return Err(DomainError::MissingSubreddit {
                listing: listing.to_string(),
            });
        }
        Ok(Self {
            listing,
            subreddit,
            filter,
            limit,
        })
    }

    /// Derive the remote query, pushing what the server can filter to it.
    #[must_use]
    pub fn query(&self) -> ListingQuery {
        let mut query = ListingQuery::new(self.listing, self.subreddit.clone());
        match self.listing {
            ListingKind::ModLog => {
                query.action = self.filter.action;
                query.moderators = self
                    .filter
                    .moderators
                    .as_ref()
                    .map(|mods| mods.iter().cloned().collect())
                    .unwrap_or_default();
            }
            ListingKind::ModQueue => query.only = self.filter.kind,
            _ => {}
        }
        query
    }

    /// Short description used for job commands and logs.
    #[must_use]
    pub fn describe(&self) -> String {
        match &self.subreddit {
            Some(sub) => format!("{} r/{} limit={}", self.listing, sub, self.limit),
            None => format!("{} limit={}", self.listing, self.limit),
        }
    }
}

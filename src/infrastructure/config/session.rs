//! Session defaults: page size and per-listing limits.

use serde::Deserialize;

use crate::domain::{Limit, ListingKind};

/// Largest page the remote API serves.
pub const MAX_PAGE_SIZE: usize = 100;

/// Defaults applied when a shell command does not give `--limit`.
///
/// Limits are raw integers; a negative value means unlimited.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_limit")]
    pub modqueue_limit: i64,
    #[serde(default = "default_limit")]
    pub unmoderated_limit: i64,
    #[serde(default = "default_long_limit")]
    pub modlog_limit: i64,
    #[serde(default = "default_limit")]
    pub posts_limit: i64,
    #[serde(default = "default_long_limit")]
    pub messages_limit: i64,
}

const fn default_page_size() -> usize {
    MAX_PAGE_SIZE
}

const fn default_limit() -> i64 {
    100
}

const fn default_long_limit() -> i64 {
    1000
}

impl SessionConfig {
    /// The default limit for a listing.
    #[must_use]
    pub fn limit_for(&self, listing: ListingKind) -> Limit {
        let raw = match listing {
            ListingKind::ModQueue => self.modqueue_limit,
            ListingKind::Unmoderated => self.unmoderated_limit,
            ListingKind::ModLog => self.modlog_limit,
            ListingKind::Posts(_) => self.posts_limit,
            ListingKind::Inbox | ListingKind::Unread | ListingKind::Modmail => self.messages_limit,
        };
        Limit::from_raw(raw)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            modqueue_limit: default_limit(),
            unmoderated_limit: default_limit(),
            modlog_limit: default_long_limit(),
            posts_limit: default_limit(),
            messages_limit: default_long_limit(),
        }
    }
}

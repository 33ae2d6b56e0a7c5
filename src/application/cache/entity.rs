//! Session-lifetime cache of resolved entities.

use parking_lot::RwLock;
use std::collections::HashMap;

use crate::domain::{Entity, SubredditName};

/// Cache key for a resolved subreddit.
#[must_use]
pub fn subreddit_key(name: &SubredditName) -> String {
    format!("sub_{name}")
}

/// Thread-safe key/value store of previously resolved entities.
///
/// No eviction and no TTL: an entry lives until [`clear`](Self::clear) is
/// called at session teardown. Writers block readers for the duration of a
/// single insert.
pub struct EntityCache {
    entries: RwLock<HashMap<String, Entity>>,
}

impl EntityCache {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Get a copy of the entity stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Entity> {
        self.entries.read().get(key).cloned()
    }

    /// Store `value` under `key`, replacing any previous entry.
    pub fn put(&self, key: impl Into<String>, value: Entity) {
        self.entries.write().insert(key.into(), value);
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Number of cached entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for EntityCache {
    fn default() -> Self {
        Self::new()
    }
}

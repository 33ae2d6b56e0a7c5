//! Session caches used by application services.
//!
//! - [`entity::EntityCache`]: resolved entities keyed by a synthetic name

pub mod entity;

pub use entity::{subreddit_key, EntityCache};

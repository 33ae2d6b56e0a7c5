//! Content-API-agnostic domain types.
//!
//! Nothing in here performs I/O: entities, names, filter specifications,
//! listing requests and the job state machine are plain data with the
//! invariants enforced by their constructors.

pub mod action;
pub mod entity;
pub mod error;
pub mod filter;
pub mod id;
pub mod job;
pub mod listing;

pub use action::ModActionType;
pub use entity::{
    Comment, Distinguish, Entity, EntityKind, Message, ModAction, Post, Subreddit, User,
};
pub use filter::{FilterSpec, KindFilter};
pub use id::{Fullname, JobId, SubredditName, Username};
pub use job::JobState;
pub use listing::{Limit, ListingKind, ListingQuery, ListingRequest, PostSort};

//! Application services (use cases).
//!
//! These services orchestrate domain logic over the [`ContentClient`]
//! port to implement the shell's use cases.
//!
//! [`ContentClient`]: crate::port::ContentClient

pub mod cache;
pub mod content;
pub mod job;
pub mod listing;
pub mod moderation;
pub mod session;

pub use session::Session;

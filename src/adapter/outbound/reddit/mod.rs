//! Reddit OAuth API integration.

pub mod auth;
pub mod client;
pub mod dto;
pub mod settings;

pub use client::RedditClient;
pub use settings::{Credentials, RedditConfig, RedditHttpConfig};

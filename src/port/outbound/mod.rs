//! Outbound ports (driven side): interfaces implemented by outbound adapters.

pub mod client;

pub use client::{BanRequest, ContentClient, NewPost, Page, PostBody};

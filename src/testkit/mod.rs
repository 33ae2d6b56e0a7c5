//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`client`] - [`ScriptedClient`](client::ScriptedClient), an in-memory
//!   [`ContentClient`](crate::port::ContentClient) with call recording and
//!   scripted failures.
//! - [`domain`] - Builders for posts, comments, messages and mod actions.

pub mod client;
pub mod domain;

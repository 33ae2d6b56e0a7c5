//! Implementations of ports (hexagonal adapters).
//!
//! - [`inbound`] drives the application: the interactive CLI.
//! - [`outbound`] is driven by it: the Reddit HTTP client.

pub mod inbound;
pub mod outbound;

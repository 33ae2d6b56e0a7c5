//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!              ┌──────────────────────┐
//!   shell ───▶ │  Application         │ ───▶ ContentClient ───▶ remote API
//!              │  (session, jobs,     │
//!              │   listing, cache)    │
//!              └──────────────────────┘
//! ```
//!
//! The shell drives the application directly; the only driven-side
//! dependency is the remote content API.

pub mod outbound;

pub use outbound::{BanRequest, ContentClient, NewPost, Page, PostBody};

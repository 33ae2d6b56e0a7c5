//! modsh - an interactive moderation shell for Reddit.
//!
//! Listings (mod queue, unmoderated, mod log, posts, inboxes) are fetched
//! page by page, narrowed by a client-side filter and either printed in the
//! foreground or run as background jobs that can be polled, drained,
//! waited on and stopped while the shell stays responsive.
//!
//! # Modules
//!
//! - [`domain`] - Entities, names, filter specifications, listing requests
//!   and the job state machine
//! - [`port`] - The [`ContentClient`](port::ContentClient) boundary to the
//!   remote API
//! - [`application`] - Entity cache, listing pipeline, jobs, moderation and
//!   the [`Session`](application::Session) tying them together
//! - [`adapter`] - The Reddit HTTP client and the interactive CLI
//! - [`infrastructure`] - Configuration, logging and wiring
//! - [`error`] - Error types for the crate
//!
//! # Features
//!
//! - `testkit` - Scripted in-memory client and entity builders for tests
//!
//! # Example
//!
//! ```no_run
//! use modsh::domain::{FilterSpec, Limit, ListingKind, ListingRequest};
//! use modsh::infrastructure::{bootstrap, config::Config};
//!
//! # async fn demo() -> modsh::error::Result<()> {
//! let config = Config::resolve(None)?;
//! let session = bootstrap::start_session(&config).await?;
//! let request = ListingRequest::new(
//!     ListingKind::ModQueue,
//!     Some("rust".parse()?),
//!     FilterSpec::default().with_authors(["spammer"]),
//!     Limit::AtMost(50),
//! )?;
//! let job = session.submit_listing(request);
//! let done = session.wait(job).await?;
//! println!("{} items", done.output.len());
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

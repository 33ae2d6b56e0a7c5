//! Domain validation errors for core domain types.
//!
//! This module defines errors that occur when domain invariants are violated:
//! illegal job state transitions, malformed names and actions aimed at an
//! entity kind that cannot receive them.
//!
//! # Examples
//!
//! ```
//! use modsh::domain::error::DomainError;
//! use modsh::domain::job::JobState;
//!
//! let result = JobState::Completed.transition(JobState::Running);
//! assert!(matches!(result, Err(DomainError::InvalidTransition { .. })));
//! ```

use thiserror::Error;

use super::entity::EntityKind;
use super::job::JobState;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Job states only move forward.
    #[error("illegal job transition from {from} to {to}")]
    InvalidTransition {
        /// State the job was in.
        from: JobState,
        /// State that was requested.
        to: JobState,
    },

    /// Names must be non-empty after prefix normalization.
    #[error("{field} cannot be empty")]
    EmptyName {
        /// Which name was empty.
        field: &'static str,
    },

    /// The action cannot be applied to this kind of entity.
    #[error("cannot {action} a {kind}")]
    UnsupportedTarget {
        /// Verb that was attempted.
        action: &'static str,
        /// Kind of the entity it was aimed at.
        kind: EntityKind,
    },

    /// A listing that needs a subreddit was requested without one.
    #[error("{listing} requires a subreddit")]
    MissingSubreddit {
        /// Listing name.
        listing: String,
    },

    /// Unrecognized value for an enumerated field.
    #[error("unknown {field}: {value}")]
    UnknownValue {
        /// Field being parsed.
        field: &'static str,
        /// The value that failed to parse.
        value: String,
    },
}

//! Job lifecycle states.
//!
//! ```text
//! NotStarted ──start──▶ Running ──ok──────▶ Completed
//!                          │────error────▶ Failed
//!                          └────stop─────▶ Stopped
//! ```
//!
//! `NotStarted` is the only initial state; the three right-hand states are
//! terminal. No state is ever revisited.

use std::fmt;

use serde::Serialize;

use super::error::DomainError;

/// Lifecycle state of a background job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    NotStarted,
    Running,
    Completed,
    Failed,
    Stopped,
}

impl JobState {
    /// True for `Completed`, `Failed` and `Stopped`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Stopped)
    }

    /// Position in the partial order `NotStarted < Running < terminal`.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::NotStarted => 0,
            Self::Running => 1,
            Self::Completed | Self::Failed | Self::Stopped => 2,
        }
    }

    /// Whether `self -> next` is one of the four legal edges.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::NotStarted, Self::Running)
                | (Self::Running, Self::Completed)
                | (Self::Running, Self::Failed)
                | (Self::Running, Self::Stopped)
        )
    }

    /// Validate a transition, returning the new state.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidTransition`] for any edge not drawn in
    /// the module diagram.
    pub fn transition(self, next: Self) -> Result<Self, DomainError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(DomainError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    /// Display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "NotStarted",
            Self::Running => "Running",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
            Self::Stopped => "Stopped",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

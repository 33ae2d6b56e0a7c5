use thiserror::Error;

use crate::domain::error::DomainError;
use crate::domain::JobId;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Failures reported by the remote content API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("remote returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("remote rejected the request: {0}")]
    Api(String),

    #[error("unexpected payload: {0}")]
    Decode(String),

    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },
}

/// Job lookup and control errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JobError {
    #[error("no job with id {0}")]
    NotFound(JobId),

    #[error("job {0} is still running")]
    StillRunning(JobId),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Job(#[from] JobError),

    #[error("{target}: {source}")]
    Target {
        target: String,
        #[source]
        source: Box<Error>,
    },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Attach the identifier of whatever the failing call was about.
    #[must_use]
    pub fn for_target(self, target: impl Into<String>) -> Self {
        Self::Target {
            target: target.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, looking through `Target` wrappers.
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::Target { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_prefixes_message_and_keeps_root() {
        let err = Error::from(RemoteError::NotFound {
            kind: "subreddit",
            name: "nope".into(),
        })
        .for_target("r/nope");

        assert_eq!(err.to_string(), "r/nope: subreddit not found: nope");
        assert!(matches!(
            err.root(),
            Error::Remote(RemoteError::NotFound { .. })
        ));
    }
}

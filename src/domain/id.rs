//! Domain identifier types with proper encapsulation.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::entity::EntityKind;
use super::error::DomainError;

/// Reddit fullname (`t3_abc123`) - newtype for type safety.
///
/// The inner String is private to ensure all construction goes through
/// the defined constructors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Fullname(String);

impl Fullname {
    /// Create a new Fullname from a string.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Build a fullname from a kind prefix and base36 id.
    pub fn from_parts(prefix: &str, id: &str) -> Self {
        Self(format!("{prefix}_{id}"))
    }

    /// Get the fullname as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The base36 id without its kind prefix.
    pub fn id(&self) -> &str {
        self.0.split_once('_').map_or(self.0.as_str(), |(_, id)| id)
    }

    /// Entity kind named by the prefix, if it is a known one.
    pub fn kind(&self) -> Option<EntityKind> {
        self.0
            .split_once('_')
            .and_then(|(prefix, _)| EntityKind::from_prefix(prefix))
    }
}

impl fmt::Display for Fullname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Fullname {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Fullname {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Subreddit display name with any `/r/` or `r/` prefix stripped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SubredditName(String);

impl SubredditName {
    /// Normalize and validate a subreddit name.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyName`] when nothing is left after the
    /// prefix is removed.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let name = strip_prefixes(raw.trim(), &["/r/", "r/"]);
        if name.is_empty() {
            return Err(DomainError::EmptyName { field: "subreddit" });
        }
        Ok(Self(name.to_string()))
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubredditName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SubredditName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Username with any `/u/`, `u/`, `/user/` or `user/` prefix stripped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Normalize and validate a username.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyName`] when nothing is left after the
    /// prefix is removed.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let name = strip_prefixes(raw.trim(), &["/user/", "user/", "/u/", "u/"]);
        if name.is_empty() {
            return Err(DomainError::EmptyName { field: "username" });
        }
        Ok(Self(name.to_string()))
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Username {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn strip_prefixes<'a>(raw: &'a str, prefixes: &[&str]) -> &'a str {
    prefixes
        .iter()
        .find_map(|p| raw.strip_prefix(p))
        .unwrap_or(raw)
        .trim_end_matches('/')
}

/// Job identifier - sequential within a session so it is easy to type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct JobId(u64);

impl JobId {
    /// Create a JobId from its raw number.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw number.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for JobId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| DomainError::UnknownValue {
                field: "job id",
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fullname_id_strips_prefix() {
        let name = Fullname::new("t3_abc123");
        assert_eq!(name.id(), "abc123");
        assert_eq!(Fullname::from_parts("t1", "xyz").as_str(), "t1_xyz");
        assert_eq!(name.kind(), Some(EntityKind::Post));
        assert_eq!(Fullname::new("abc").kind(), None);
    }

    #[test]
    fn subreddit_name_strips_prefixes() {
        assert_eq!(SubredditName::parse("/r/rust").unwrap().as_str(), "rust");
        assert_eq!(SubredditName::parse("r/rust").unwrap().as_str(), "rust");
        assert_eq!(SubredditName::parse("rust").unwrap().as_str(), "rust");
        assert_eq!(SubredditName::parse("/r/rust/").unwrap().as_str(), "rust");
    }

    #[test]
    fn subreddit_name_rejects_empty() {
        assert!(matches!(
            SubredditName::parse("/r/"),
            Err(DomainError::EmptyName { field: "subreddit" })
        ));
    }

    #[test]
    fn username_strips_prefixes() {
        for raw in ["/u/alice", "u/alice", "/user/alice", "user/alice", "alice"] {
            assert_eq!(Username::parse(raw).unwrap().as_str(), "alice", "{raw}");
        }
    }

    #[test]
    fn job_id_round_trips_through_text() {
        let id: JobId = "42".parse().unwrap();
        assert_eq!(id, JobId::new(42));
        assert_eq!(id.to_string(), "42");
        assert!("abc".parse::<JobId>().is_err());
    }
}

//! Reddit API configuration.

use serde::Deserialize;

use crate::error::ConfigError;

/// Endpoints and HTTP behaviour for the Reddit client.
#[derive(Debug, Clone, Deserialize)]
pub struct RedditConfig {
    /// OAuth API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Token endpoint for the password grant.
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
    /// User-Agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default)]
    pub http: RedditHttpConfig,
}

fn default_api_url() -> String {
    "https://oauth.reddit.com".into()
}

fn default_auth_url() -> String {
    "https://www.reddit.com/api/v1/access_token".into()
}

fn default_user_agent() -> String {
    concat!("modsh/", env!("CARGO_PKG_VERSION")).into()
}

impl Default for RedditConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            auth_url: default_auth_url(),
            user_agent: default_user_agent(),
            http: RedditHttpConfig::default(),
        }
    }
}

/// Reddit HTTP client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RedditHttpConfig {
    /// Request timeout in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_http_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

const fn default_http_timeout_ms() -> u64 {
    10_000
}

const fn default_http_connect_timeout_ms() -> u64 {
    5_000
}

impl Default for RedditHttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_http_timeout_ms(),
            connect_timeout_ms: default_http_connect_timeout_ms(),
        }
    }
}

/// Script-app credentials. Read from the environment, never from a file.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

/// Environment variables holding the credentials.
pub const USERNAME_VAR: &str = "MODSH_USERNAME";
pub const PASSWORD_VAR: &str = "MODSH_PASSWORD";
pub const CLIENT_ID_VAR: &str = "MODSH_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "MODSH_CLIENT_SECRET";

impl Credentials {
    /// Read credentials from `MODSH_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] naming the first unset or empty
    /// variable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read credentials through an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] naming the first missing key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |field: &'static str| {
            lookup(field)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::MissingField { field })
        };
        Ok(Self {
            username: require(USERNAME_VAR)?,
            password: require(PASSWORD_VAR)?,
            client_id: require(CLIENT_ID_VAR)?,
            client_secret: require(CLIENT_SECRET_VAR)?,
        })
    }
}

//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file; every section is optional.
//! Credentials are never read from the file, see
//! [`Credentials::from_env`](crate::adapter::outbound::reddit::Credentials::from_env).
//!
//! # Example
//!
//! ```no_run
//! use modsh::infrastructure::config::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("modsh.toml")?;
//!     config.logging.init();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;
use url::Url;

use super::logging::LoggingConfig;
use super::session::{SessionConfig, MAX_PAGE_SIZE};
use crate::adapter::outbound::reddit::RedditConfig;
use crate::error::{ConfigError, Result};

/// Config file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "modsh.toml";

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Remote endpoints and HTTP timeouts.
    #[serde(default)]
    pub reddit: RedditConfig,

    /// Page size and default listing limits.
    #[serde(default)]
    pub session: SessionConfig,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is malformed or fails
    /// validation.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load `path` if given, else the default file if it exists, else defaults.
    ///
    /// An explicitly named file must exist.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`].
    #[allow(clippy::result_large_err)]
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::load(DEFAULT_CONFIG_PATH),
            None => Ok(Self::default()),
        }
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] for empty required strings and
    /// [`ConfigError::InvalidValue`] for out-of-range values.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        check_url("api_url", &self.reddit.api_url)?;
        check_url("auth_url", &self.reddit.auth_url)?;
        if self.reddit.user_agent.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "user_agent",
            }
            .into());
        }
        if self.reddit.http.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.session.page_size == 0 || self.session.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidValue {
                field: "page_size",
                reason: format!("must be between 1 and {MAX_PAGE_SIZE}"),
            }
            .into());
        }
        Ok(())
    }
}

fn check_url(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::MissingField { field }.into());
    }
    Url::parse(value).map_err(|e| ConfigError::InvalidValue {
        field,
        reason: e.to_string(),
    })?;
    Ok(())
}

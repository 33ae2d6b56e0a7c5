//! Handler for `check-config`.

use std::path::Path;

use super::output;
use crate::adapter::outbound::reddit::settings::{
    CLIENT_ID_VAR, CLIENT_SECRET_VAR, PASSWORD_VAR, USERNAME_VAR,
};
use crate::adapter::outbound::reddit::Credentials;
use crate::error::Result;
use crate::infrastructure::config::{Config, DEFAULT_CONFIG_PATH};

/// Validate the configuration without logging in.
///
/// Missing credentials are reported as a warning; only an unreadable or
/// invalid file fails the check.
pub fn execute(config_path: Option<&Path>) -> Result<()> {
    let config = Config::resolve(config_path)?;
    let shown = config_path.map_or_else(
        || DEFAULT_CONFIG_PATH.to_string(),
        |p| p.display().to_string(),
    );

    output::section("Configuration Check");
    output::field("Config", shown);
    output::success("Configuration file is valid");

    output::section("Summary");
    output::field("API", &config.reddit.api_url);
    output::field("Auth", &config.reddit.auth_url);
    output::field("User agent", &config.reddit.user_agent);
    output::field("Page size", config.session.page_size);
    output::field("Log level", &config.logging.level);

    match Credentials::from_env() {
        Ok(creds) => output::success(&format!("Credentials found for u/{}", creds.username)),
        Err(e) => {
            output::warning(&format!("Credentials incomplete: {e}"));
            output::hint(&format!(
                "set {USERNAME_VAR}, {PASSWORD_VAR}, {CLIENT_ID_VAR} and {CLIENT_SECRET_VAR}"
            ));
        }
    }

    output::success("Configuration check complete");
    Ok(())
}

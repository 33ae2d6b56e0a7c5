//! Composition root: wire the remote client into a session.

use std::sync::Arc;

use tracing::info;

use crate::adapter::outbound::reddit::{Credentials, RedditClient};
use crate::application::Session;
use crate::error::Result;
use crate::infrastructure::config::Config;
use crate::port::ContentClient;

/// Build the Reddit client from `config` and credentials in the environment.
///
/// # Errors
///
/// Returns [`ConfigError::MissingField`](crate::error::ConfigError::MissingField)
/// when a credential variable is unset.
pub fn build_client(config: &Config) -> Result<Arc<dyn ContentClient>> {
    let credentials = Credentials::from_env()?;
    info!(
        api_url = %config.reddit.api_url,
        username = %credentials.username,
        "Building Reddit client"
    );
    Ok(Arc::new(RedditClient::from_config(&config.reddit, credentials)))
}

/// Log in and start a session with the configured page size.
///
/// # Errors
///
/// Returns credential errors or the remote identity-check failure.
pub async fn start_session(config: &Config) -> Result<Session> {
    let client = build_client(config)?;
    connect(client, config).await
}

/// Start a session over an already-built client.
///
/// # Errors
///
/// Returns the remote identity-check failure.
pub async fn connect(client: Arc<dyn ContentClient>, config: &Config) -> Result<Session> {
    Session::start(client, config.session.page_size).await
}

//! OAuth password-grant tokens.

use std::time::{Duration, Instant};

use parking_lot::RwLock;
use reqwest::Client as HttpClient;
use tracing::{debug, info};

use super::dto::TokenResponse;
use super::settings::Credentials;
use crate::error::{RemoteError, Result};

/// Tokens are refreshed this long before the server says they expire.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

struct AccessToken {
    value: String,
    expires_at: Instant,
}

/// Holds the current bearer token, if any.
#[derive(Default)]
pub struct TokenCache {
    token: RwLock<Option<AccessToken>>,
}

impl TokenCache {
    /// The cached token if it has not expired.
    pub fn current(&self) -> Option<String> {
        self.token
            .read()
            .as_ref()
            .filter(|t| Instant::now() < t.expires_at)
            .map(|t| t.value.clone())
    }

    pub fn store(&self, value: String, expires_in: Duration) {
        let expires_at = Instant::now() + expires_in.saturating_sub(EXPIRY_MARGIN);
        *self.token.write() = Some(AccessToken { value, expires_at });
    }

    pub fn clear(&self) {
        *self.token.write() = None;
    }
}

/// Exchange script-app credentials for a bearer token.
///
/// # Errors
///
/// Returns [`RemoteError::AuthFailed`] when the endpoint rejects the
/// credentials or answers without a token.
pub async fn request_token(
    http: &HttpClient,
    auth_url: &str,
    credentials: &Credentials,
) -> Result<(String, Duration)> {
    debug!(url = %auth_url, user = %credentials.username, "Requesting access token");
    let response = http
        .post(auth_url)
        .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
        .form(&[
            ("grant_type", "password"),
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
        ])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(RemoteError::AuthFailed(format!("token endpoint returned {status}")).into());
    }

    let token: TokenResponse = response.json().await?;
    match (token.access_token, token.error) {
        (Some(value), None) => {
            info!(user = %credentials.username, expires_in = token.expires_in, "Authenticated");
            Ok((value, Duration::from_secs(token.expires_in)))
        }
        (_, Some(error)) => Err(RemoteError::AuthFailed(error).into()),
        (None, None) => Err(RemoteError::AuthFailed("no access token in response".into()).into()),
    }
}

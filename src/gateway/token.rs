//! OAuth2 client-credentials token acquisition
//!
//! The token is fetched once, in the background, when the client is created.
//! There is no expiry tracking and no refresh.

use crate::config::ClientConfig;
use crate::gateway::client::decode_response;
use crate::gateway::errors::{ApiError, ApiResult};
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use tracing::{debug, error, info};
use url::Url;

/// Token endpoint, relative to the mode's base URL
pub const TOKEN_PATH: &str = "accounts/v1/oauth/token";

/// Opaque bearer credential
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Where the one-shot token fetch currently stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenState {
    /// Fetch still in flight
    Pending,
    /// Token acquired; attached to every later call
    Set(AccessToken),
    /// Fetch failed; calls proceed without an Authorization header
    Failed(ApiError),
}

impl TokenState {
    pub fn is_pending(&self) -> bool {
        matches!(self, TokenState::Pending)
    }

    pub fn token(&self) -> Option<&AccessToken> {
        match self {
            TokenState::Set(token) => Some(token),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    token_type: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    expires_in: Option<serde_json::Value>,
}

/// POST the client-credentials grant and return the access token.
pub(crate) async fn fetch_token(
    http: &Client,
    base_url: &Url,
    config: &ClientConfig,
) -> ApiResult<AccessToken> {
    let url = base_url.join(TOKEN_PATH)?;
    debug!("Requesting access token from {}", url);

    let response = http
        .post(url)
        .basic_auth(&config.client_id, Some(&config.client_secret))
        .form(&[("grant_type", "client_credentials")])
        .send()
        .await
        .map_err(|e| ApiError::from_send_error(&e))?;

    let body: TokenResponse = decode_response(response).await?;

    body.access_token
        .filter(|token| !token.is_empty())
        .map(AccessToken::new)
        .ok_or_else(|| ApiError::request("Token response did not contain an access_token"))
}

/// Run the fetch and turn its outcome into the final token state.
pub(crate) async fn acquire(http: Client, base_url: Url, config: ClientConfig) -> TokenState {
    match fetch_token(&http, &base_url, &config).await {
        Ok(token) => {
            info!("Access token acquired for {} mode", config.mode);
            TokenState::Set(token)
        }
        Err(e) => {
            error!(
                "Access token acquisition failed (status {}): {}",
                e.status_code(),
                e
            );
            TokenState::Failed(e)
        }
    }
}

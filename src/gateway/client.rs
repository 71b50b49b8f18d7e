use crate::config::{BaseUrls, ClientConfig, ConfigError, PartialConfig, Settings};
use crate::gateway::errors::{ApiError, ApiResult};
use crate::gateway::token::{self, AccessToken, TokenState};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::ops::RangeInclusive;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use url::Url;

/// Statuses handed back to the caller as a decoded body rather than an error
pub const ACCEPTED_STATUS: RangeInclusive<u16> = 200..=500;

const USER_AGENT: &str = concat!("mobile-money-gateway/", env!("CARGO_PKG_VERSION"));

pub fn accepts_status(status: StatusCode) -> bool {
    ACCEPTED_STATUS.contains(&status.as_u16())
}

/// Per-call request options merged into the outgoing request
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// JSON body
    pub data: Option<serde_json::Value>,
    /// Extra headers; a bearer token, when present, replaces any Authorization here
    pub headers: HeaderMap,
    /// Query string pairs
    pub query: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options carrying `data` serialized as the JSON body.
    pub fn json<T: Serialize + ?Sized>(data: &T) -> ApiResult<Self> {
        Ok(Self::new().with_data(serde_json::to_value(data)?))
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

/// HTTP client that owns the transport and the access token.
///
/// Creating one starts the token fetch in the background without waiting for
/// it. Calls made before the fetch settles go out without an Authorization
/// header; await [`AuthenticatedClient::ready`] first to avoid that.
#[derive(Debug, Clone)]
pub struct AuthenticatedClient {
    config: ClientConfig,
    base_url: Url,
    http: Client,
    token: watch::Receiver<TokenState>,
}

impl AuthenticatedClient {
    /// Validate `config`, build the transport and spawn the token fetch.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(config: ClientConfig, base_urls: &BaseUrls) -> Result<Self, ConfigError> {
        config.validate()?;

        let runtime = tokio::runtime::Handle::try_current().map_err(|_| ConfigError::NoRuntime)?;

        let base_url = base_urls.for_mode(config.mode).clone();

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ConfigError::http_client(e.to_string()))?;

        let (sender, receiver) = watch::channel(TokenState::Pending);
        runtime.spawn({
            let http = http.clone();
            let base_url = base_url.clone();
            let config = config.clone();
            async move {
                let state = token::acquire(http, base_url, config).await;
                sender.send_replace(state);
            }
        });

        info!(
            "Gateway client initialized for {} mode with URL: {}",
            config.mode, base_url
        );

        Ok(Self {
            config,
            base_url,
            http,
            token: receiver,
        })
    }

    /// Merge `partial` over the environment defaults in `settings`, then build.
    pub fn from_partial(partial: PartialConfig, settings: &Settings) -> Result<Self, ConfigError> {
        let config = settings.resolve(partial)?;
        Self::new(config, &settings.base_urls)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn token_state(&self) -> TokenState {
        self.token.borrow().clone()
    }

    pub fn has_token(&self) -> bool {
        self.token.borrow().token().is_some()
    }

    /// Wait until the background token fetch has settled.
    ///
    /// Returns the fetch error if acquisition failed. The client stays usable
    /// either way; failed acquisition only means calls are unauthenticated.
    pub async fn ready(&self) -> ApiResult<()> {
        let mut token = self.token.clone();
        let state = token
            .wait_for(|state| !state.is_pending())
            .await
            .map_err(|_| ApiError::request("Token acquisition task stopped before completing"))?;

        if let TokenState::Failed(e) = &*state {
            return Err(e.clone());
        }
        Ok(())
    }

    /// POST to `path` with the current token, decoding the body as `T`.
    pub async fn post<T: DeserializeOwned>(&self, path: &str, options: RequestOptions) -> ApiResult<T> {
        self.call(path, options, Method::POST).await
    }

    /// Send an authenticated request to `path`, relative to the base URL.
    ///
    /// Any status in [`ACCEPTED_STATUS`] yields the decoded body. Everything
    /// else is raised as an [`ApiError`].
    pub async fn call<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
        method: Method,
    ) -> ApiResult<T> {
        let url = self.base_url.join(path)?;

        let mut headers = options.headers;
        let bearer = self.token.borrow().token().map(AccessToken::bearer);
        if let Some(bearer) = bearer {
            let value = HeaderValue::from_str(&bearer)
                .map_err(|e| ApiError::request(format!("Invalid access token: {}", e)))?;
            headers.insert(AUTHORIZATION, value);
        }

        debug!(
            "Dispatching {} {} (authenticated: {})",
            method,
            url,
            headers.contains_key(AUTHORIZATION)
        );
        if self.config.debug {
            debug!("Request payload for {}: {:?}", url, options.data);
        }

        let mut request = self.http.request(method, url.clone()).headers(headers);
        if !options.query.is_empty() {
            request = request.query(&options.query);
        }
        if let Some(data) = &options.data {
            request = request.json(data);
        }

        let response = request.send().await.map_err(|e| {
            let err = ApiError::from_send_error(&e);
            warn!("Request to {} failed before a response: {}", url, e);
            err
        })?;

        let text = read_body(response).await?;
        if self.config.debug {
            debug!("Response body from {}: {}", url, text);
        }
        parse_body(&text)
    }
}

/// Read the body, raising an upstream error for statuses outside the accepted range.
pub(crate) async fn read_body(response: Response) -> ApiResult<String> {
    let status = response.status();
    if !accepts_status(status) {
        return Err(upstream_error(status, response.text().await.ok().as_deref()));
    }

    response
        .text()
        .await
        .map_err(|e| ApiError::request(format!("Failed to read response body: {}", e)))
}

/// Upstream error for a rejected status. A body that could not be read falls
/// back to the canonical reason.
fn upstream_error(status: StatusCode, body: Option<&str>) -> ApiError {
    let message = upstream_message(status, body.unwrap_or_default());
    warn!("Upstream returned HTTP {}: {}", status, message);
    ApiError::upstream(status.as_u16(), message)
}

pub(crate) async fn decode_response<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let text = read_body(response).await?;
    parse_body(&text)
}

fn parse_body<T: DeserializeOwned>(text: &str) -> ApiResult<T> {
    // An empty body decodes as JSON null.
    if text.trim().is_empty() {
        return serde_json::from_str("null").map_err(decode_error);
    }

    // A body that is not JSON is offered to `T` as a plain string.
    serde_json::from_str(text).or_else(|_| {
        serde_json::from_value(serde_json::Value::String(text.to_string())).map_err(decode_error)
    })
}

fn decode_error(e: serde_json::Error) -> ApiError {
    ApiError::request(format!("Failed to decode response body: {}", e))
}

fn upstream_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("message")?.as_str().map(str::to_owned))
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown Error").to_string())
}

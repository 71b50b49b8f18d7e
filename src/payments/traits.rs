//! Capability trait used by payment builders
//!
//! Builders only need to send an authenticated request; they never see the
//! token or the transport behind it.

use crate::gateway::client::{AuthenticatedClient, RequestOptions};
use crate::gateway::errors::ApiResult;
use async_trait::async_trait;
use reqwest::Method;

/// Anything that can send an authenticated request and return its JSON body
#[async_trait]
pub trait AuthenticatedCall: Send + Sync {
    /// Send a request to `path` and decode the body as JSON.
    ///
    /// # Arguments
    /// * `path` - Endpoint path, relative to the configured base URL
    /// * `options` - Body, headers and query to merge into the request
    /// * `method` - HTTP method
    ///
    /// # Returns
    /// * The decoded body, or the normalized error for a failed call
    async fn call_json(
        &self,
        path: &str,
        options: RequestOptions,
        method: Method,
    ) -> ApiResult<serde_json::Value>;
}

#[async_trait]
impl AuthenticatedCall for AuthenticatedClient {
    async fn call_json(
        &self,
        path: &str,
        options: RequestOptions,
        method: Method,
    ) -> ApiResult<serde_json::Value> {
        self.call(path, options, method).await
    }
}

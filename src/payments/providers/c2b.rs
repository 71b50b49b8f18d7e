//! Customer-to-business payment requests
//!
//! [`C2BRequestBuilder`] shapes a payment request into the upstream wire
//! payload, sends it through an authenticated call and folds the outcome,
//! success or failure, into a [`FundingResult`].

use crate::config::{BaseUrls, ClientConfig, ConfigError};
use crate::gateway::client::{AuthenticatedClient, RequestOptions};
use crate::gateway::errors::{ApiError, ApiResult};
use crate::payments::traits::AuthenticatedCall;
use crate::payments::types::{C2BRequestInput, C2BWirePayload, FundingResult, UpstreamResponse};
use reqwest::Method;
use tracing::{debug, info, warn};
use uuid::Uuid;

const UNKNOWN_ERROR: &str = "Unknown Error";

/// Builds and sends C2B payment requests
#[derive(Debug, Clone)]
pub struct C2BRequestBuilder<C = AuthenticatedClient> {
    client: C,
    /// Carried for callers; not part of the request payload
    organization_id: String,
    result_url: String,
    endpoint: String,
}

impl C2BRequestBuilder<AuthenticatedClient> {
    /// Create the builder together with its own authenticated client.
    pub fn new(
        config: ClientConfig,
        base_urls: &BaseUrls,
        organization_id: impl Into<String>,
        result_url: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let client = AuthenticatedClient::new(config, base_urls)?;
        Ok(Self::with_client(client, organization_id, result_url, endpoint))
    }
}

impl<C: AuthenticatedCall> C2BRequestBuilder<C> {
    pub fn with_client(
        client: C,
        organization_id: impl Into<String>,
        result_url: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            client,
            organization_id: organization_id.into(),
            result_url: result_url.into(),
            endpoint: endpoint.into(),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn organization_id(&self) -> &str {
        &self.organization_id
    }

    pub fn result_url(&self) -> &str {
        &self.result_url
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send a C2B payment request.
    ///
    /// Never fails: upstream and transport errors end up in the result's
    /// `response_status` / `response_message`.
    pub async fn request(&self, input: C2BRequestInput) -> FundingResult {
        let reference = Uuid::new_v4().to_string();
        let payload = C2BWirePayload::new(&input, &self.result_url, reference.as_str());
        let mut result = FundingResult::pending(&input, reference.as_str());

        info!(
            "Initiating C2B payment: amount={} provider={} reference={}",
            input.amount, input.service_provider_id, reference
        );
        if let Some(fields) = &input.custom_fields_key_value {
            debug!(
                "{} custom fields not forwarded for reference={}",
                fields.len(),
                reference
            );
        }

        match self.send(&payload).await {
            Ok(body) => {
                apply_response(&mut result, body);
                info!(
                    "C2B payment answered: reference={}, status={}",
                    reference,
                    result.response_status.as_deref().unwrap_or("none")
                );
            }
            Err(e) => {
                warn!("C2B payment failed: reference={}, error={}", reference, e);
                apply_error(&mut result, &e);
            }
        }

        result
    }

    async fn send(&self, payload: &C2BWirePayload) -> ApiResult<serde_json::Value> {
        let options = RequestOptions::json(payload)?;
        self.client
            .call_json(&self.endpoint, options, Method::POST)
            .await
    }
}

fn apply_response(result: &mut FundingResult, body: serde_json::Value) {
    let response = UpstreamResponse::from_body(&body);

    result.json_response = Some(body.to_string());
    if response.is_success() {
        result.transaction_id = response.id;
    }
    result.response_status = response.status;
    result.response_message = response.message;
}

fn apply_error(result: &mut FundingResult, error: &ApiError) {
    let message = error.message();
    result.response_status = Some(error.status_code().to_string());
    result.response_message = Some(if message.is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        message
    });
}

//! C2B payment types and data structures
//!
//! Request input, the wire payload the upstream expects, and the funding record
//! returned to callers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fixed command identifier for customer-to-business payments
pub const COMMAND_ID: &str = "CustomerPayment";

/// Upstream status code marking an accepted payment
pub const SUCCESS_STATUS: &str = "000001";

/// Caller input for a single C2B payment request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct C2BRequestInput {
    /// Service provider the payment is routed through
    pub service_provider_id: String,
    /// Merchant wallet credited by the payment
    pub merchant_wallet: String,
    /// Paying customer's mobile number
    pub mobile_number: String,
    /// Amount as a decimal string
    pub amount: String,
    /// Free-form fields attached by the caller; not part of the wire payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_fields_key_value: Option<HashMap<String, String>>,
}

/// One `{id, label, value}` entry of a parameter list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestParameter {
    pub id: String,
    pub label: String,
    pub value: String,
}

impl RequestParameter {
    pub fn new(id: &str, label: &str, value: impl Into<String>) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            value: value.into(),
        }
    }
}

/// Body of a C2B request as sent upstream.
///
/// Field order and the parameter ids are part of the upstream contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct C2BWirePayload {
    pub command_id: String,
    pub service_provider_id: String,
    pub request_parameters: Vec<RequestParameter>,
    pub reference_parameters: Vec<RequestParameter>,
    pub reference: String,
}

impl C2BWirePayload {
    pub fn new(input: &C2BRequestInput, result_url: &str, reference: impl Into<String>) -> Self {
        Self {
            command_id: COMMAND_ID.to_string(),
            service_provider_id: input.service_provider_id.clone(),
            request_parameters: vec![
                RequestParameter::new("merchantWallet", "Merchant Wallet", &input.merchant_wallet),
                RequestParameter::new("accountNumber", "Account Number", &input.mobile_number),
                RequestParameter::new("amount", "Amount", &input.amount),
            ],
            reference_parameters: vec![RequestParameter::new(
                "resultUrl",
                "Result URL",
                result_url,
            )],
            reference: reference.into(),
        }
    }
}

/// Upstream reply to a C2B request; fields are read leniently
///
/// Only JSON objects carry fields. Scalar values such as a numeric `id` are
/// kept in their JSON text form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

impl UpstreamResponse {
    /// Read `status`, `message` and `id` from a decoded response body.
    pub fn from_body(body: &serde_json::Value) -> Self {
        let Some(fields) = body.as_object() else {
            return Self::default();
        };
        let field = |name: &str| fields.get(name).and_then(scalar_text);

        Self {
            status: field("status"),
            message: field("message"),
            id: field("id"),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some(SUCCESS_STATUS)
    }
}

fn scalar_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(text) => Some(text.clone()),
        serde_json::Value::Number(_) | serde_json::Value::Bool(_) => Some(value.to_string()),
        _ => None,
    }
}

/// Outcome of one payment request attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingResult {
    /// Reference generated for this request
    pub fund_reference: String,
    pub service_provider: String,
    /// Paying customer's mobile number
    pub account_number: String,
    pub amount: String,
    /// Serialized upstream response, when one was received
    pub json_response: Option<String>,
    /// Upstream transaction id, set only for a successful status
    pub transaction_id: Option<String>,
    pub response_status: Option<String>,
    pub response_message: Option<String>,
}

impl FundingResult {
    pub fn pending(input: &C2BRequestInput, fund_reference: impl Into<String>) -> Self {
        Self {
            fund_reference: fund_reference.into(),
            service_provider: input.service_provider_id.clone(),
            account_number: input.mobile_number.clone(),
            amount: input.amount.clone(),
            json_response: None,
            transaction_id: None,
            response_status: None,
            response_message: None,
        }
    }

    pub fn is_successful(&self) -> bool {
        self.transaction_id.is_some()
    }
}

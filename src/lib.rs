//! Client SDK for a mobile-money payment API
//!
//! - [`gateway`]: OAuth2 client-credentials token handling and the
//!   authenticated request pipeline with normalized errors
//! - [`payments`]: customer-to-business (C2B) payment requests
//! - [`carrier`]: mobile network operator detection from a phone number
//! - [`config`]: client configuration and environment-derived defaults
//!
//! ```no_run
//! use mobile_money_gateway::config::{PartialConfig, Settings};
//! use mobile_money_gateway::payments::providers::C2BRequestBuilder;
//! use mobile_money_gateway::payments::types::C2BRequestInput;
//! use mobile_money_gateway::gateway::AuthenticatedClient;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let settings = Settings::from_env()?;
//! let client = AuthenticatedClient::from_partial(PartialConfig::default(), &settings)?;
//! client.ready().await?;
//!
//! let builder = C2BRequestBuilder::with_client(
//!     client,
//!     "ORG-1",
//!     "https://merchant.example.com/c2b/result",
//!     "api/v1/payments/c2b",
//! );
//! let result = builder
//!     .request(C2BRequestInput {
//!         service_provider_id: "SP001".into(),
//!         merchant_wallet: "MW-1".into(),
//!         mobile_number: "0712345678".into(),
//!         amount: "100".into(),
//!         custom_fields_key_value: None,
//!     })
//!     .await;
//! println!("{:?}", result.response_status);
//! # Ok(())
//! # }
//! ```

pub mod carrier;
pub mod config;
pub mod gateway;
pub mod payments;

pub use carrier::{classify, Carrier};
pub use config::{BaseUrls, ClientConfig, ConfigError, Mode, PartialConfig, Settings};
pub use gateway::{ApiError, ApiResult, AuthenticatedClient, RequestOptions, TokenState};
pub use payments::providers::C2BRequestBuilder;
pub use payments::types::{C2BRequestInput, FundingResult};

//! Authenticated access to the mobile-money API
//!
//! [`AuthenticatedClient`] owns the HTTP transport and a single access token
//! fetched once at construction. Every outbound call goes through
//! [`AuthenticatedClient::call`], which attaches the token when one is set and
//! normalizes failures into [`ApiError`].

pub mod client;
pub mod errors;
pub mod token;

pub use client::{AuthenticatedClient, RequestOptions, ACCEPTED_STATUS};
pub use errors::{ApiError, ApiResult};
pub use token::{AccessToken, TokenState, TOKEN_PATH};

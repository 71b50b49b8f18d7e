use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Normalized failure of an authenticated call.
///
/// Every transport or HTTP failure is folded into one of three kinds, each
/// carrying an HTTP-style status code.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The upstream answered with a status outside the accepted range
    #[error("Upstream request failed with status {status}: {message}")]
    Upstream { status: u16, message: String },

    /// The request went out but no response came back
    #[error("Gateway Timeout")]
    GatewayTimeout,

    /// The request could not be built or sent, or its response not decoded
    #[error("{message}")]
    Request { message: String },
}

impl ApiError {
    pub const GATEWAY_TIMEOUT_STATUS: u16 = 504;
    pub const REQUEST_ERROR_STATUS: u16 = 500;

    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    pub fn request(message: impl Into<String>) -> Self {
        Self::Request {
            message: message.into(),
        }
    }

    /// HTTP-style status code carried by this error
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Upstream { status, .. } => *status,
            ApiError::GatewayTimeout => Self::GATEWAY_TIMEOUT_STATUS,
            ApiError::Request { .. } => Self::REQUEST_ERROR_STATUS,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Classify a reqwest error raised before any response was received.
    pub fn from_send_error(err: &reqwest::Error) -> Self {
        if err.is_builder() {
            ApiError::request(format!("Failed to build request: {}", err))
        } else {
            ApiError::GatewayTimeout
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::request(format!("JSON error: {}", err))
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        ApiError::request(format!("Invalid request URL: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::upstream(503, "down").status_code(), 503);
        assert_eq!(ApiError::GatewayTimeout.status_code(), 504);
        assert_eq!(ApiError::request("boom").status_code(), 500);
    }

    #[test]
    fn test_messages() {
        assert_eq!(ApiError::GatewayTimeout.message(), "Gateway Timeout");
        assert_eq!(ApiError::request("boom").message(), "boom");

        let message = ApiError::upstream(502, "Bad gateway from switch").message();
        assert!(message.contains("Bad gateway from switch"));
        assert!(message.contains("502"));
    }

    #[test]
    fn test_url_errors_are_local() {
        let err: ApiError = url::Url::parse("::").unwrap_err().into();
        assert_eq!(err.status_code(), 500);
    }
}

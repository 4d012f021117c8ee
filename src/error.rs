//! Error types for the HTTP client
//!
//! Provides unified error handling using thiserror. The cache layer itself
//! never fails; only request execution does.

use thiserror::Error;

// == Client Error Enum ==
/// Unified error type for request execution.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Method outside the supported set
    #[error("Invalid HTTP method: {0:?}")]
    InvalidMethod(String),

    /// URL could not be resolved or parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The transport failed to complete the exchange
    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Response body did not decode as the requested type
    #[error("Failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(Box::new(err))
    }
}

// == Result Type Alias ==
/// Convenience Result type for the client.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ClientError::InvalidMethod("FETCH".to_string()).to_string(),
            "Invalid HTTP method: \"FETCH\""
        );
        assert_eq!(
            ClientError::InvalidUrl("relative URL without a base".to_string()).to_string(),
            "Invalid URL: relative URL without a base"
        );
    }

    #[test]
    fn test_decode_error_from_serde() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(ClientError::from(err), ClientError::Decode(_)));
    }
}

//! Error types for LLM operations

use thiserror::Error;

/// Result type for LLM operations
pub type Result<T> = std::result::Result<T, LLMError>;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LLMError {
    /// API request failed
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Invalid API key or authentication failed
    #[error("Invalid API key or authentication failed")]
    AuthenticationFailed,

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Model not found
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Unexpected response format
    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl LLMError {
    /// Map an HTTP status and body to the matching error variant
    pub fn from_status(status: u16, body: String, model: &str) -> Self {
        match status {
            401 | 403 => Self::AuthenticationFailed,
            429 => Self::RateLimitExceeded(body),
            400 | 422 => Self::InvalidRequest(body),
            404 => Self::ModelNotFound(model.to_string()),
            _ => Self::RequestFailed(format!("HTTP {status}: {body}")),
        }
    }
}

impl From<LLMError> for agent_core::Error {
    fn from(err: LLMError) -> Self {
        agent_core::Error::ProcessingFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status() {
        assert!(matches!(
            LLMError::from_status(401, String::new(), "m"),
            LLMError::AuthenticationFailed
        ));
        assert!(matches!(
            LLMError::from_status(429, "slow down".to_string(), "m"),
            LLMError::RateLimitExceeded(body) if body == "slow down"
        ));
        assert!(matches!(
            LLMError::from_status(404, String::new(), "llama3-70b-8192"),
            LLMError::ModelNotFound(model) if model == "llama3-70b-8192"
        ));
        assert_eq!(
            LLMError::from_status(503, "down".to_string(), "m").to_string(),
            "API request failed: HTTP 503: down"
        );
    }

    #[test]
    fn test_into_core_error() {
        let err: agent_core::Error = LLMError::AuthenticationFailed.into();
        assert!(err.to_string().contains("authentication failed"));
    }
}

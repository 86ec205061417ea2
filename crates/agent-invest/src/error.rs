//! Error types for the investment pipeline

use thiserror::Error;

/// Investment pipeline specific errors
#[derive(Debug, Error)]
pub enum InvestError {
    /// Ticker does not look like 1-5 uppercase letters
    #[error("Invalid ticker symbol")]
    InvalidTicker(String),

    /// Market data could not be assembled for a valid ticker
    #[error("Failed to fetch market data: {0}")]
    MarketData(String),

    /// Yahoo Finance API error
    #[error("Yahoo Finance error: {0}")]
    YahooFinance(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Prompt template rendering failed
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// A built-in pattern failed to compile
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Report persistence error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A reasoning capability failed
    #[error(transparent)]
    Capability(#[from] agent_core::Error),
}

/// Result type alias for investment operations
pub type Result<T> = std::result::Result<T, InvestError>;

impl From<agent_utils::ConfigError> for InvestError {
    fn from(err: agent_utils::ConfigError) -> Self {
        InvestError::Config(err.to_string())
    }
}

/// Convert InvestError to agent_core::Error
impl From<InvestError> for agent_core::Error {
    fn from(err: InvestError) -> Self {
        match err {
            InvestError::Capability(inner) => inner,
            other => agent_core::Error::ProcessingFailed(other.to_string()),
        }
    }
}

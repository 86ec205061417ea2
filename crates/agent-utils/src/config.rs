//! Environment-driven configuration helpers

use std::str::FromStr;
use thiserror::Error;

/// Errors raised while reading configuration values
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is present but cannot be parsed
    #[error("invalid value for {name}: {value}")]
    Invalid { name: String, value: String },
}

/// Load a `.env` file from the working directory or its parents, if any
///
/// Returns `true` when a file was found and applied.
pub fn load_dotenv() -> bool {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "loaded .env file");
            true
        }
        Err(_) => false,
    }
}

/// Read a non-empty environment variable
pub fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read and parse an environment variable
///
/// Missing variables yield `Ok(None)`; unparsable ones are an error rather
/// than silently falling back.
pub fn env_parse<T: FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    match env_var(name) {
        None => Ok(None),
        Some(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid {
                name: name.to_string(),
                value,
            }),
    }
}

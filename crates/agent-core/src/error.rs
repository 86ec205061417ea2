//! Error types for agent-core

use thiserror::Error;

/// Result type alias for agent-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for capability and tool operations
#[derive(Error, Debug)]
pub enum Error {
    /// Capability construction failed
    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    /// The reasoning engine could not produce text for a role
    #[error("{role} capability failed: {message}")]
    CapabilityFailed { role: String, message: String },

    /// A tool invocation failed before producing output
    #[error("Tool '{tool}' failed: {message}")]
    ToolFailed { tool: String, message: String },

    /// Processing failed for any other reason
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

impl Error {
    /// Build a capability failure for the given role name
    pub fn capability(role: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CapabilityFailed {
            role: role.into(),
            message: message.into(),
        }
    }
}

//! Tool trait definition

use agent_core::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Trait for tools that a reasoning role can execute
///
/// A tool that can degrade gracefully should return `Ok` with an error
/// description the model can read, and reserve `Err` for malformed calls.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Execute the tool with parameters matching [`Tool::input_schema`]
    async fn execute(&self, params: Value) -> Result<Value>;

    /// Unique name within a registry
    fn name(&self) -> &str;

    /// What the tool does, shown to the model
    fn description(&self) -> &str;

    /// JSON Schema of the tool's input
    fn input_schema(&self) -> Value;
}

//! Runtime for reasoning roles
//!
//! This crate turns an [`agent_llm::LLMProvider`] plus a
//! [`agent_tools::ToolRegistry`] into an [`agent_core::ReasoningCapability`]:
//! the [`AgentExecutor`] runs the model/tool loop for one prompt, and
//! [`LlmCapability`] exposes it through the role-parameterized interface.

pub mod capability;
pub mod executor;

// Re-export key types
pub use capability::LlmCapability;
pub use executor::{AgentExecutor, AgentExecutorBuilder, ExecutorConfig};

//! LLM provider abstraction layer
//!
//! This crate provides provider-agnostic types for chat completions:
//!
//! - Message types, including tool use and tool results
//! - Completion request/response types
//! - Tool definitions for function calling
//! - The [`LLMProvider`] trait
//! - An OpenAI-compatible provider that targets Groq by default

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;
pub mod providers;
pub mod tools;

// Re-export main types
pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use messages::{ContentBlock, Message, MessageContent, Role};
pub use provider::LLMProvider;
pub use tools::ToolDefinition;

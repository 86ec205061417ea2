//! Completion request and response types

use crate::{Message, ToolDefinition};
use agent_core::RoleConfig;
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// Default sampling temperature when neither the role nor the caller sets one
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// One chat completion call: model, transcript and sampling limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,

    /// Full transcript sent on every turn
    pub messages: Vec<Message>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    pub max_tokens: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Tool definitions offered to the model, omitted when empty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
}

/// What a provider returned for one [`CompletionRequest`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub message: Message,
    pub stop_reason: StopReason,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The model finished its turn
    EndTurn,
    /// Output was cut at `max_tokens`
    MaxTokens,
    /// The model wants one or more tools run
    ToolUse,
}

/// Prompt and completion token counts reported by the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: usize,
    pub output_tokens: usize,
}

impl TokenUsage {
    pub fn total(&self) -> usize {
        self.input_tokens + self.output_tokens
    }
}

impl AddAssign for TokenUsage {
    fn add_assign(&mut self, rhs: Self) {
        self.input_tokens += rhs.input_tokens;
        self.output_tokens += rhs.output_tokens;
    }
}

impl CompletionRequest {
    pub fn builder(model: impl Into<String>) -> CompletionRequestBuilder {
        CompletionRequestBuilder::new(model)
    }

    /// Seed a request with a role's system prompt, output cap and temperature
    pub fn for_role(model: impl Into<String>, role: &RoleConfig) -> CompletionRequestBuilder {
        let mut builder = Self::builder(model)
            .system(role.system_prompt())
            .max_tokens(role.max_tokens);
        builder.0.temperature = role.temperature;
        builder
    }
}

/// Fluent wrapper that fills in a [`CompletionRequest`]
#[derive(Debug, Clone)]
pub struct CompletionRequestBuilder(CompletionRequest);

impl CompletionRequestBuilder {
    const DEFAULT_MAX_TOKENS: usize = 1024;

    pub fn new(model: impl Into<String>) -> Self {
        Self(CompletionRequest {
            model: model.into(),
            messages: Vec::new(),
            system: None,
            max_tokens: Self::DEFAULT_MAX_TOKENS,
            temperature: None,
            tools: None,
        })
    }

    /// Replace the transcript
    pub fn messages(mut self, messages: Vec<Message>) -> Self {
        self.0.messages = messages;
        self
    }

    pub fn add_message(mut self, message: Message) -> Self {
        self.0.messages.push(message);
        self
    }

    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.0.system = Some(system.into());
        self
    }

    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.0.max_tokens = max_tokens;
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.0.temperature = Some(temperature);
        self
    }

    /// An empty list leaves `tools` unset so the provider sees no tool block
    pub fn tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.0.tools = (!tools.is_empty()).then_some(tools);
        self
    }

    pub fn build(self) -> CompletionRequest {
        self.0
    }
}

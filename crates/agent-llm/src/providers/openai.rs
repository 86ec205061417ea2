//! OpenAI-compatible chat completions provider
//!
//! Speaks the `/chat/completions` protocol shared by OpenAI, Groq and most
//! local inference servers. Groq is the default target.
//!
//! ```no_run
//! use agent_llm::{CompletionRequest, LLMProvider, Message};
//! use agent_llm::providers::{OpenAIConfig, OpenAIProvider};
//!
//! # async fn example() -> agent_llm::Result<()> {
//! let provider = OpenAIProvider::with_config(OpenAIConfig::groq("gsk-..."))?;
//! let request = CompletionRequest::builder("llama3-70b-8192")
//!     .add_message(Message::user("Hello!"))
//!     .build();
//! let response = provider.complete(request).await?;
//! println!("{}", response.message.text().unwrap_or_default());
//! # Ok(())
//! # }
//! ```

use crate::{
    CompletionRequest, CompletionResponse, ContentBlock, LLMError, LLMProvider, Message,
    MessageContent, Result, Role, StopReason, TokenUsage, ToolDefinition,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Groq's OpenAI-compatible endpoint
pub const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";
/// OpenAI's endpoint
pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration for an OpenAI-compatible provider
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// API key for bearer authentication
    pub api_key: String,

    /// Base URL, without the trailing `/chat/completions`
    pub api_base: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Name reported by [`LLMProvider::name`]
    pub provider_name: String,
}

impl OpenAIConfig {
    /// Config targeting Groq
    pub fn groq(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: GROQ_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            provider_name: "groq".to_string(),
        }
    }

    /// Config targeting OpenAI
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: OPENAI_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            provider_name: "openai".to_string(),
        }
    }

    /// Create config from environment variables
    ///
    /// `GROQ_API_KEY` selects Groq; otherwise `OPENAI_API_KEY` selects OpenAI
    /// (or whatever `OPENAI_API_BASE` points at).
    pub fn from_env() -> Result<Self> {
        if let Some(key) = non_empty_env("GROQ_API_KEY") {
            return Ok(Self::groq(key));
        }

        let key = non_empty_env("OPENAI_API_KEY").ok_or_else(|| {
            LLMError::ConfigurationError(
                "neither GROQ_API_KEY nor OPENAI_API_KEY is set".to_string(),
            )
        })?;
        let mut config = Self::openai(key);
        if let Some(base) = non_empty_env("OPENAI_API_BASE") {
            config.api_base = base;
        }
        Ok(config)
    }

    /// Set custom API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Set request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// OpenAI-compatible provider
pub struct OpenAIProvider {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIProvider {
    /// Create a provider with the given configuration
    pub fn with_config(config: OpenAIConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(LLMError::ConfigurationError("API key is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a provider from environment variables
    pub fn from_env() -> Result<Self> {
        Self::with_config(OpenAIConfig::from_env()?)
    }

    /// Get the current configuration
    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    #[instrument(skip(self, request), fields(model = %request.model, provider = %self.config.provider_name))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let wire_request = WireRequest {
            model: request.model.clone(),
            messages: build_messages(request.system, request.messages),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            tools: request.tools.as_deref().map(convert_tools),
        };

        debug!(
            messages = wire_request.messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.api_base))
            .bearer_auth(&self.config.api_key)
            .json(&wire_request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await?;
            return Err(LLMError::from_status(status, body, &request.model));
        }

        let wire_response: WireResponse = response.json().await.map_err(|e| {
            LLMError::UnexpectedResponse(format!("Failed to parse response: {e}"))
        })?;

        let choice = wire_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LLMError::UnexpectedResponse("No choices in response".to_string()))?;

        let usage = wire_response.usage.map_or_else(TokenUsage::default, |u| TokenUsage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        });

        debug!(
            finish_reason = %choice.finish_reason.as_deref().unwrap_or("none"),
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            "Received chat completion"
        );

        Ok(CompletionResponse {
            message: parse_response_message(choice.message)?,
            stop_reason: map_stop_reason(choice.finish_reason.as_deref().unwrap_or("stop")),
            usage,
        })
    }

    fn name(&self) -> &str {
        &self.config.provider_name
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct WireRequest {
    model: String,
    messages: Vec<WireMessage>,
    max_tokens: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<WireTool>>,
}

#[derive(Debug, Serialize, PartialEq)]
struct WireMessage {
    role: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<WireToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

impl WireMessage {
    fn text(role: &'static str, content: String) -> Self {
        Self {
            role,
            content: Some(content),
            tool_calls: None,
            tool_call_id: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct WireTool {
    #[serde(rename = "type")]
    tool_type: &'static str,
    function: WireFunction,
}

#[derive(Debug, Serialize)]
struct WireFunction {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type", default = "function_type")]
    tool_type: String,
    function: WireFunctionCall,
}

fn function_type() -> String {
    "function".to_string()
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct WireFunctionCall {
    name: String,
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireResponseMessage {
    content: Option<String>,
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    prompt_tokens: usize,
    completion_tokens: usize,
}

// ============================================================================
// Conversion functions
// ============================================================================

/// The system prompt travels as the first message in this protocol
fn build_messages(system: Option<String>, messages: Vec<Message>) -> Vec<WireMessage> {
    let mut result = Vec::with_capacity(messages.len() + 1);
    if let Some(sys) = system {
        result.push(WireMessage::text("system", sys));
    }
    for msg in messages {
        result.extend(convert_message(msg));
    }
    result
}

/// Tool results become separate `tool` role messages, so one message may
/// expand into several
fn convert_message(msg: Message) -> Vec<WireMessage> {
    let role = match msg.role {
        Role::User => "user",
        Role::Assistant => "assistant",
        Role::System => "system",
    };

    let blocks = match msg.content {
        Some(MessageContent::Text(text)) => return vec![WireMessage::text(role, text)],
        None => return vec![WireMessage::text(role, String::new())],
        Some(MessageContent::Blocks(blocks)) => blocks,
    };

    let mut texts = Vec::new();
    let mut tool_calls = Vec::new();
    let mut tool_messages = Vec::new();

    for block in blocks {
        match block {
            ContentBlock::Text { text } => texts.push(text),
            ContentBlock::ToolUse { id, name, input } => tool_calls.push(WireToolCall {
                id,
                tool_type: function_type(),
                function: WireFunctionCall {
                    name,
                    arguments: input.to_string(),
                },
            }),
            ContentBlock::ToolResult {
                tool_use_id,
                content,
                ..
            } => tool_messages.push(WireMessage {
                role: "tool",
                content: Some(content),
                tool_calls: None,
                tool_call_id: Some(tool_use_id),
            }),
        }
    }

    let mut out = Vec::new();
    if !texts.is_empty() || !tool_calls.is_empty() {
        out.push(WireMessage {
            role,
            content: if texts.is_empty() {
                None
            } else {
                Some(texts.join("\n"))
            },
            tool_calls: if tool_calls.is_empty() {
                None
            } else {
                Some(tool_calls)
            },
            tool_call_id: None,
        });
    }
    out.extend(tool_messages);
    out
}

fn convert_tools(tools: &[ToolDefinition]) -> Vec<WireTool> {
    tools
        .iter()
        .map(|tool| WireTool {
            tool_type: "function",
            function: WireFunction {
                name: tool.name.clone(),
                description: tool.description.clone(),
                parameters: tool.input_schema.clone(),
            },
        })
        .collect()
}

fn parse_response_message(msg: WireResponseMessage) -> Result<Message> {
    let mut blocks = Vec::new();

    if let Some(content) = msg.content.filter(|c| !c.is_empty()) {
        blocks.push(ContentBlock::Text { text: content });
    }

    for call in msg.tool_calls.unwrap_or_default() {
        let input = if call.function.arguments.trim().is_empty() {
            serde_json::Value::Object(serde_json::Map::new())
        } else {
            serde_json::from_str(&call.function.arguments).map_err(|e| {
                LLMError::UnexpectedResponse(format!("Failed to parse tool arguments: {e}"))
            })?
        };
        blocks.push(ContentBlock::ToolUse {
            id: call.id,
            name: call.function.name,
            input,
        });
    }

    Ok(Message {
        role: Role::Assistant,
        content: Some(MessageContent::Blocks(blocks)),
    })
}

fn map_stop_reason(reason: &str) -> StopReason {
    match reason {
        "length" => StopReason::MaxTokens,
        "tool_calls" | "function_call" => StopReason::ToolUse,
        "stop" => StopReason::EndTurn,
        other => {
            debug!("Unknown finish reason: {}", other);
            StopReason::EndTurn
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_groq_defaults() {
        let provider = OpenAIProvider::with_config(OpenAIConfig::groq("gsk-test")).unwrap();
        assert_eq!(provider.name(), "groq");
        assert_eq!(provider.config().api_base, GROQ_API_BASE);
        assert_eq!(provider.config().timeout_secs, 120);
    }

    #[test]
    fn test_empty_key_rejected() {
        let result = OpenAIProvider::with_config(OpenAIConfig::openai("  "));
        assert!(matches!(result, Err(LLMError::ConfigurationError(_))));
    }

    #[test]
    fn test_api_base_trailing_slash_trimmed() {
        let config = OpenAIConfig::openai("k").with_api_base("http://localhost:1234/v1/");
        assert_eq!(config.api_base, "http://localhost:1234/v1");
    }

    #[test]
    fn test_system_prompt_goes_first() {
        let messages = build_messages(Some("rules".to_string()), vec![Message::user("hi")]);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], WireMessage::text("system", "rules".to_string()));
        assert_eq!(messages[1], WireMessage::text("user", "hi".to_string()));
    }

    #[test]
    fn test_assistant_tool_call_conversion() {
        let msg = Message {
            role: Role::Assistant,
            content: Some(MessageContent::Blocks(vec![ContentBlock::ToolUse {
                id: "call_1".to_string(),
                name: "web_search".to_string(),
                input: json!({"query": "NVIDIA"}),
            }])),
        };

        let wire = convert_message(msg);
        assert_eq!(wire.len(), 1);
        assert_eq!(wire[0].role, "assistant");
        assert!(wire[0].content.is_none());
        let calls = wire[0].tool_calls.as_ref().unwrap();
        assert_eq!(calls[0].function.name, "web_search");
        assert_eq!(calls[0].function.arguments, r#"{"query":"NVIDIA"}"#);
    }

    #[test]
    fn test_tool_results_become_tool_messages() {
        let msg = Message {
            role: Role::User,
            content: Some(MessageContent::Blocks(vec![
                ContentBlock::ToolResult {
                    tool_use_id: "call_1".to_string(),
                    content: "result 1".to_string(),
                    is_error: None,
                },
                ContentBlock::ToolResult {
                    tool_use_id: "call_2".to_string(),
                    content: "result 2".to_string(),
                    is_error: Some(true),
                },
            ])),
        };

        let wire = convert_message(msg);
        assert_eq!(wire.len(), 2);
        assert!(wire.iter().all(|m| m.role == "tool"));
        assert_eq!(wire[1].tool_call_id.as_deref(), Some("call_2"));
    }

    #[test]
    fn test_parse_response_with_tool_calls() {
        let raw = json!({
            "content": null,
            "tool_calls": [{
                "id": "call_7",
                "type": "function",
                "function": { "name": "web_search", "arguments": "{\"query\":\"TSLA\"}" }
            }]
        });
        let msg: WireResponseMessage = serde_json::from_value(raw).unwrap();
        let message = parse_response_message(msg).unwrap();

        assert!(message.has_tool_uses());
        assert!(message.text().is_none());
        assert_eq!(message.tool_uses()[0].2["query"], "TSLA");
    }

    #[test]
    fn test_parse_response_bad_arguments() {
        let msg = WireResponseMessage {
            content: None,
            tool_calls: Some(vec![WireToolCall {
                id: "x".to_string(),
                tool_type: function_type(),
                function: WireFunctionCall {
                    name: "web_search".to_string(),
                    arguments: "{not json".to_string(),
                },
            }]),
        };
        assert!(matches!(
            parse_response_message(msg),
            Err(LLMError::UnexpectedResponse(_))
        ));
    }

    #[test]
    fn test_stop_reason_mapping() {
        assert_eq!(map_stop_reason("stop"), StopReason::EndTurn);
        assert_eq!(map_stop_reason("length"), StopReason::MaxTokens);
        assert_eq!(map_stop_reason("tool_calls"), StopReason::ToolUse);
        assert_eq!(map_stop_reason("content_filter"), StopReason::EndTurn);
    }

    #[test]
    fn test_convert_tools() {
        let tools = convert_tools(&[ToolDefinition::new(
            "web_search",
            "Search the web",
            json!({"type": "object"}),
        )]);
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].tool_type, "function");
        assert_eq!(tools[0].function.name, "web_search");
    }
}

//! Agent executor for running model/tool loops
//!
//! The AgentExecutor implements the loop for a single prompt:
//! 1. Call the LLM with the conversation and the tools the role allows
//! 2. If tool use is requested, execute the tools and loop back
//! 3. Otherwise return the assistant's text

use agent_core::{Error, Result, RoleConfig};
use agent_llm::{
    CompletionRequest, LLMProvider, Message, StopReason, TokenUsage, ToolDefinition,
};
use agent_tools::{Tool, ToolRegistry};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Configuration for agent execution
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Maximum number of model calls per prompt (prevents infinite loops)
    pub max_iterations: usize,

    /// Model to use
    pub model: String,

    /// Temperature used when the role does not set one
    pub default_temperature: f32,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_iterations: 6,
            model: "llama3-70b-8192".to_string(),
            default_temperature: agent_llm::completion::DEFAULT_TEMPERATURE,
        }
    }
}

/// Executes the model/tool loop for one prompt under one role
pub struct AgentExecutor {
    provider: Arc<dyn LLMProvider>,
    tool_registry: Arc<ToolRegistry>,
    config: ExecutorConfig,
}

impl AgentExecutor {
    /// Create a new agent executor
    pub fn new(
        provider: Arc<dyn LLMProvider>,
        tool_registry: Arc<ToolRegistry>,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            provider,
            tool_registry,
            config,
        }
    }

    /// Create a new executor builder
    pub fn builder() -> AgentExecutorBuilder {
        AgentExecutorBuilder::new()
    }

    /// Get the executor configuration
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Name of the backing provider
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Run the loop for `prompt` under `role` and return the final text
    pub async fn run(&self, prompt: &str, role: &RoleConfig) -> Result<String> {
        let tools = self.tool_registry.select(&role.tools);
        let definitions = build_tool_definitions(&tools);
        if definitions.len() < role.tools.len() {
            warn!(
                role = %role.name,
                requested = role.tools.len(),
                available = definitions.len(),
                "Some tools requested by the role are not registered"
            );
        }

        let mut conversation = vec![Message::user(prompt)];
        let mut usage = TokenUsage::default();

        for iteration in 1..=self.config.max_iterations {
            let request = CompletionRequest::for_role(&self.config.model, role)
                .temperature(role.temperature.unwrap_or(self.config.default_temperature))
                .messages(conversation.clone())
                .tools(definitions.clone())
                .build();

            debug!(
                role = %role.name,
                iteration,
                tool_count = definitions.len(),
                "Sending request to LLM"
            );

            let response = self
                .provider
                .complete(request)
                .await
                .map_err(|e| Error::capability(&role.name, e.to_string()))?;
            usage += response.usage;

            match response.stop_reason {
                StopReason::ToolUse if response.message.has_tool_uses() => {
                    let results = self.execute_tools(&response.message, &tools).await;
                    conversation.push(response.message);
                    conversation.extend(results);
                }
                StopReason::MaxTokens => {
                    warn!(role = %role.name, "LLM response hit the token limit");
                    return finish(&role.name, response.message.text(), iteration, usage);
                }
                _ => return finish(&role.name, response.message.text(), iteration, usage),
            }
        }

        warn!(
            role = %role.name,
            max_iterations = self.config.max_iterations,
            "Max iterations reached without a final answer"
        );
        Err(Error::capability(
            &role.name,
            format!(
                "no final answer after {} iterations",
                self.config.max_iterations
            ),
        ))
    }

    /// Execute every tool call in an assistant message
    ///
    /// Failures are reported back to the model as error results rather than
    /// aborting the loop.
    async fn execute_tools(&self, message: &Message, allowed: &[Arc<dyn Tool>]) -> Vec<Message> {
        let mut results = Vec::new();

        for (id, name, input) in message.tool_uses() {
            let Some(tool) = allowed.iter().find(|t| t.name() == name) else {
                warn!(tool_name = %name, "Model requested a tool the role may not use");
                results.push(Message::tool_error(
                    id,
                    format!("Error: tool '{name}' is not available"),
                ));
                continue;
            };

            let start = Instant::now();
            match tool.execute(input.clone()).await {
                Ok(output) => {
                    let text = render_output(&output);
                    info!(
                        tool_name = %name,
                        duration_ms = start.elapsed().as_millis() as u64,
                        result_length = text.len(),
                        "Tool execution succeeded"
                    );
                    results.push(Message::tool_result(id, text));
                }
                Err(e) => {
                    warn!(tool_name = %name, error = %e, "Tool execution failed");
                    results.push(Message::tool_error(id, format!("Error: {e}")));
                }
            }
        }

        results
    }
}

fn finish(role: &str, text: Option<String>, iterations: usize, usage: TokenUsage) -> Result<String> {
    let text = text
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| Error::capability(role, "empty response from model"))?;

    info!(
        role = %role,
        iterations,
        input_tokens = usage.input_tokens,
        output_tokens = usage.output_tokens,
        response_length = text.len(),
        "Role completed"
    );
    Ok(text)
}

/// Strings go to the model verbatim; anything else as JSON
fn render_output(output: &Value) -> String {
    match output {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn build_tool_definitions(tools: &[Arc<dyn Tool>]) -> Vec<ToolDefinition> {
    tools
        .iter()
        .map(|tool| ToolDefinition::new(tool.name(), tool.description(), tool.input_schema()))
        .collect()
}

/// Builder for AgentExecutor
pub struct AgentExecutorBuilder {
    provider: Option<Arc<dyn LLMProvider>>,
    tool_registry: Arc<ToolRegistry>,
    config: ExecutorConfig,
}

impl AgentExecutorBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            provider: None,
            tool_registry: Arc::new(ToolRegistry::new()),
            config: ExecutorConfig::default(),
        }
    }

    /// Set the LLM provider
    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the tool registry
    pub fn tool_registry(mut self, registry: Arc<ToolRegistry>) -> Self {
        self.tool_registry = registry;
        self
    }

    /// Set maximum iterations
    pub fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    /// Set the model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the fallback temperature
    pub fn default_temperature(mut self, temperature: f32) -> Self {
        self.config.default_temperature = temperature;
        self
    }

    /// Build the executor
    pub fn build(self) -> Result<AgentExecutor> {
        let provider = self
            .provider
            .ok_or_else(|| Error::InitializationFailed("Provider not set".to_string()))?;

        if self.config.max_iterations == 0 {
            return Err(Error::InitializationFailed(
                "max_iterations must be greater than 0".to_string(),
            ));
        }

        Ok(AgentExecutor::new(
            provider,
            self.tool_registry,
            self.config,
        ))
    }
}

impl Default for AgentExecutorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

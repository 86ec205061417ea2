//! LLM-backed reasoning capability

use crate::executor::AgentExecutor;
use agent_core::{ReasoningCapability, Result, RoleConfig};
use async_trait::async_trait;
use tracing::debug;

/// [`ReasoningCapability`] implemented by running the executor loop
pub struct LlmCapability {
    executor: AgentExecutor,
}

impl LlmCapability {
    pub fn new(executor: AgentExecutor) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &AgentExecutor {
        &self.executor
    }
}

#[async_trait]
impl ReasoningCapability for LlmCapability {
    async fn generate(&self, prompt: &str, role: &RoleConfig) -> Result<String> {
        debug!(role = %role.name, prompt_length = prompt.len(), "Generating");
        self.executor.run(prompt, role).await
    }

    fn name(&self) -> &str {
        self.executor.provider_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::tests::{ScriptedProvider, text_response};
    use agent_core::Error;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_generate_delegates_to_executor() {
        let provider = Arc::new(ScriptedProvider::new(vec![text_response("report")]));
        let executor = AgentExecutor::builder()
            .provider(provider.clone())
            .build()
            .unwrap();
        let capability = LlmCapability::new(executor);

        let role = RoleConfig::new("editorial", "You are an editor.");
        assert_eq!(capability.generate("draft", &role).await.unwrap(), "report");
        assert_eq!(capability.name(), "scripted");
    }

    #[tokio::test]
    async fn test_generate_reports_role_on_failure() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let executor = AgentExecutor::builder().provider(provider).build().unwrap();
        let capability = LlmCapability::new(executor);

        let role = RoleConfig::new("synthesis", "s");
        let err = capability.generate("x", &role).await.unwrap_err();
        assert!(matches!(err, Error::CapabilityFailed { role, .. } if role == "synthesis"));
    }
}

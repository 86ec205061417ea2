//! Tool registry for managing available tools

use crate::Tool;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Registry for managing tools
///
/// Tools are kept sorted by name so the definitions sent to the model are
/// stable from call to call.
#[derive(Default)]
pub struct ToolRegistry {
    tools: RwLock<BTreeMap<String, Arc<dyn Tool>>>,
}

impl ToolRegistry {
    /// Create a new tool registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any previous tool with the same name
    pub fn register(&self, tool: Arc<dyn Tool>) {
        let mut tools = self.tools.write().unwrap_or_else(PoisonError::into_inner);
        tools.insert(tool.name().to_string(), tool);
    }

    /// Tools whose names appear in `allowed`, ordered by name
    ///
    /// Unknown names are skipped.
    pub fn select(&self, allowed: &[String]) -> Vec<Arc<dyn Tool>> {
        let tools = self.tools.read().unwrap_or_else(PoisonError::into_inner);
        tools
            .iter()
            .filter(|(name, _)| allowed.iter().any(|a| a == *name))
            .map(|(_, tool)| Arc::clone(tool))
            .collect()
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{Value, json};

    struct EchoTool(&'static str);

    #[async_trait]
    impl Tool for EchoTool {
        async fn execute(&self, params: Value) -> agent_core::Result<Value> {
            Ok(params)
        }

        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            "echo"
        }

        fn input_schema(&self) -> Value {
            json!({"type": "object"})
        }
    }

    #[test]
    fn test_register_replaces_same_name() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());

        registry.register(Arc::new(EchoTool("web_search")));
        registry.register(Arc::new(EchoTool("web_search")));
        assert_eq!(registry.len(), 1);
        assert!(registry.select(&["missing".to_string()]).is_empty());
    }

    #[test]
    fn test_select_filters_and_orders() {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool("zeta")));
        registry.register(Arc::new(EchoTool("alpha")));
        registry.register(Arc::new(EchoTool("web_search")));

        let allowed = vec![
            "web_search".to_string(),
            "alpha".to_string(),
            "unknown".to_string(),
        ];
        let names: Vec<String> = registry
            .select(&allowed)
            .iter()
            .map(|t| t.name().to_string())
            .collect();

        assert_eq!(names, vec!["alpha".to_string(), "web_search".to_string()]);
        assert!(registry.select(&[]).is_empty());
    }

    #[tokio::test]
    async fn test_execute_through_registry() {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool("echo")));

        let tool = registry.select(&["echo".to_string()]).pop().unwrap();
        let out = tool.execute(json!({"q": 1})).await.unwrap();
        assert_eq!(out["q"], 1);
    }
}

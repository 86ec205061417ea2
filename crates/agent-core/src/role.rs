//! Role configuration for reasoning stages
//!
//! A role is pure data: an introduction, a numbered rule list, an output
//! length target and the tools the role may call. The token budget is
//! stated to the model in the rules; it is not enforced here.

use serde::{Deserialize, Serialize};

/// Behavioural contract for one reasoning role
///
/// # Example
///
/// ```
/// use agent_core::RoleConfig;
///
/// let role = RoleConfig::new("editorial", "You are a financial editor.")
///     .with_rule("Keep under 1500 tokens")
///     .token_budget(1500);
///
/// assert!(role.system_prompt().contains("1. Keep under 1500 tokens"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleConfig {
    /// Stable role name, used in logs and errors
    pub name: String,

    /// Opening sentence of the system prompt
    pub description: String,

    /// Ordered behavioural rules
    pub rules: Vec<String>,

    /// Target output length stated to the model, in tokens
    pub token_budget: usize,

    /// Hard completion cap sent to the provider
    pub max_tokens: usize,

    /// Sampling temperature override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Names of registered tools this role may call
    #[serde(default)]
    pub tools: Vec<String>,

    /// Ask for markdown formatted output
    pub markdown: bool,
}

impl RoleConfig {
    /// Create a role with no rules and default limits
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            rules: Vec::new(),
            token_budget: 800,
            max_tokens: 1024,
            temperature: None,
            tools: Vec::new(),
            markdown: true,
        }
    }

    /// Append a rule
    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rules.push(rule.into());
        self
    }

    /// Append several rules in order
    pub fn with_rules<I, S>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rules.extend(rules.into_iter().map(Into::into));
        self
    }

    /// Set the stated output length target
    pub fn token_budget(mut self, tokens: usize) -> Self {
        self.token_budget = tokens;
        self
    }

    /// Set the provider completion cap
    pub fn max_tokens(mut self, tokens: usize) -> Self {
        self.max_tokens = tokens;
        self
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Allow the role to call a registered tool
    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tools.push(tool.into());
        self
    }

    /// Toggle markdown output
    pub fn markdown(mut self, markdown: bool) -> Self {
        self.markdown = markdown;
        self
    }

    /// Whether this role may call tools at all
    pub fn uses_tools(&self) -> bool {
        !self.tools.is_empty()
    }

    /// Render the system prompt sent with every call for this role
    pub fn system_prompt(&self) -> String {
        let mut prompt = self.description.clone();
        prompt.push('\n');

        if !self.rules.is_empty() {
            prompt.push_str("Rules:\n");
            for (i, rule) in self.rules.iter().enumerate() {
                prompt.push_str(&format!("{}. {rule}\n", i + 1));
            }
        }

        if self.markdown {
            prompt.push_str("Format your response in markdown.\n");
        }

        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let role = RoleConfig::new("research", "You are a researcher.");
        assert_eq!(role.token_budget, 800);
        assert_eq!(role.max_tokens, 1024);
        assert!(role.temperature.is_none());
        assert!(!role.uses_tools());
        assert!(role.markdown);
    }

    #[test]
    fn test_system_prompt_numbers_rules_in_order() {
        let role = RoleConfig::new("finance", "You are an analyst.")
            .with_rules(["Focus on ratios", "Never provide investment advice"])
            .markdown(false);

        assert_eq!(
            role.system_prompt(),
            "You are an analyst.\nRules:\n1. Focus on ratios\n2. Never provide investment advice\n"
        );
    }

    #[test]
    fn test_system_prompt_without_rules() {
        let role = RoleConfig::new("plain", "Hello.");
        assert_eq!(role.system_prompt(), "Hello.\nFormat your response in markdown.\n");
    }

    #[test]
    fn test_tools() {
        let role = RoleConfig::new("research", "r").with_tool("web_search");
        assert!(role.uses_tools());
        assert_eq!(role.tools, vec!["web_search".to_string()]);
    }

    #[test]
    fn test_serde_roundtrip_keeps_tools() {
        let role = RoleConfig::new("research", "r")
            .with_tool("web_search")
            .temperature(0.2);
        let json = serde_json::to_string(&role).unwrap();
        let back: RoleConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, role);
    }
}

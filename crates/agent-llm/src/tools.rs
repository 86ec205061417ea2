//! Tool definition types for LLM tool use

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tool definition sent to the provider
///
/// Describes a callable tool: its name, what it does, and the JSON Schema
/// of its input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name (must match the tool in the registry)
    pub name: String,

    /// Description of what the tool does
    pub description: String,

    /// JSON schema for the tool's input parameters
    pub input_schema: Value,
}

impl ToolDefinition {
    /// Create a new tool definition
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// Helpers to build JSON schemas for tools
pub mod schema {
    use serde_json::{Value, json};

    /// Object schema with the given properties and required keys
    ///
    /// ```
    /// use agent_llm::tools::schema;
    /// use serde_json::json;
    ///
    /// let s = schema::object(json!({ "query": schema::string("Search query") }), &["query"]);
    /// assert_eq!(s["required"][0], "query");
    /// ```
    pub fn object(properties: Value, required: &[&str]) -> Value {
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// String property schema
    pub fn string(description: &str) -> Value {
        json!({
            "type": "string",
            "description": description,
        })
    }

    /// Integer property schema with a default
    pub fn integer(description: &str, default: i64) -> Value {
        json!({
            "type": "integer",
            "description": description,
            "default": default,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_helpers() {
        let s = schema::object(
            json!({
                "query": schema::string("What to search for"),
                "max_results": schema::integer("Result limit", 5),
            }),
            &["query"],
        );

        assert_eq!(s["type"], "object");
        assert_eq!(s["properties"]["query"]["type"], "string");
        assert_eq!(s["properties"]["max_results"]["default"], 5);
        assert_eq!(s["required"], json!(["query"]));
    }
}

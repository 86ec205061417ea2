//! Web search tool for the research role
//!
//! Search problems never surface as tool errors: the model receives a short
//! `Error...` string instead and can carry on without results.

use crate::config::InvestConfig;
use crate::error::{InvestError, Result};
use agent_core::Result as AgentResult;
use agent_llm::tools::schema;
use agent_tools::Tool;
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, warn};

const TAVILY_SEARCH_URL: &str = "https://api.tavily.com/search";

/// Characters of page content kept per result
const CONTENT_PREVIEW_CHARS: usize = 500;

pub const QUERY_TOO_SHORT: &str = "Error: Search query too short";
pub const NO_RESULTS: &str = "Error: No results found";

/// Tavily-backed `web_search` tool
pub struct TavilySearchTool {
    client: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
    search_depth: String,
    max_results: usize,
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    query: String,
    #[serde(default)]
    max_results: Option<usize>,
}

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    query: String,
    search_depth: &'a str,
    include_raw_content: bool,
    max_results: usize,
}

/// A cleaned search hit as shown to the model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub content: String,
    pub published_date: String,
}

impl TavilySearchTool {
    pub fn new(config: &InvestConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout.min(Duration::from_secs(60)))
            .build()?;

        Ok(Self {
            client,
            api_key: config.tavily_api_key.clone(),
            endpoint: TAVILY_SEARCH_URL.to_string(),
            search_depth: config.search_depth.clone(),
            max_results: config.search_max_results,
        })
    }

    /// Point the tool at a different search endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Run a search and render the outcome as text for the model
    pub async fn search(&self, query: &str, max_results: usize) -> String {
        if query.chars().count() < 3 {
            return QUERY_TOO_SHORT.to_string();
        }

        match self.request(query, max_results).await {
            Ok(response) if response_is_empty(&response) => NO_RESULTS.to_string(),
            Ok(response) => {
                let hits = clean_results(&response, max_results);
                debug!(query, hits = hits.len(), "Search completed");
                render_results(query, &hits)
            }
            Err(e) => {
                warn!(query, error = %e, "Search failed");
                format!("Error performing search: {e}")
            }
        }
    }

    async fn request(&self, query: &str, max_results: usize) -> Result<Value> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| InvestError::Config("TAVILY_API_KEY not set".to_string()))?;

        let body = TavilyRequest {
            query: format!("Comprehensive financial research about {query}"),
            search_depth: &self.search_depth,
            include_raw_content: true,
            max_results,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }
}

fn response_is_empty(response: &Value) -> bool {
    response
        .get("results")
        .and_then(Value::as_array)
        .is_none_or(Vec::is_empty)
}

/// Keep results that carry both content and a URL, trimmed for the prompt
fn clean_results(response: &Value, max_results: usize) -> Vec<SearchHit> {
    let Some(results) = response.get("results").and_then(Value::as_array) else {
        return Vec::new();
    };

    results
        .iter()
        .take(max_results)
        .filter_map(|result| {
            let content = result
                .get("content")
                .and_then(Value::as_str)
                .filter(|c| !c.is_empty())?;
            let url = result
                .get("url")
                .and_then(Value::as_str)
                .filter(|u| !u.is_empty())?;

            Some(SearchHit {
                title: string_or(result, "title", "No title"),
                url: url.to_string(),
                content: format!("{}...", preview(content)),
                published_date: string_or(result, "published_date", "Unknown"),
            })
        })
        .collect()
}

fn string_or(result: &Value, field: &str, default: &str) -> String {
    result
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

fn preview(content: &str) -> &str {
    match content.char_indices().nth(CONTENT_PREVIEW_CHARS) {
        Some((idx, _)) => &content[..idx],
        None => content,
    }
}

fn render_results(query: &str, hits: &[SearchHit]) -> String {
    let output = json!({
        "query": query,
        "date": Utc::now().to_rfc3339(),
        "results": hits,
    });
    serde_json::to_string_pretty(&output).unwrap_or_else(|e| format!("Error performing search: {e}"))
}

#[async_trait]
impl Tool for TavilySearchTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: SearchParams = serde_json::from_value(params).map_err(|e| {
            agent_core::Error::ProcessingFailed(format!("Invalid parameters: {e}"))
        })?;

        let max_results = params.max_results.unwrap_or(self.max_results).clamp(1, 20);
        Ok(Value::String(self.search(params.query.trim(), max_results).await))
    }

    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web for recent news, analyst opinions and industry outlook on a company. \
         Returns JSON with the top results, each with title, url, a content excerpt and publish date."
    }

    fn input_schema(&self) -> Value {
        schema::object(
            json!({
                "query": schema::string("Company or topic to research"),
                "max_results": schema::integer("Maximum number of results", 5),
            }),
            &["query"],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool(api_key: Option<&str>) -> TavilySearchTool {
        let mut config = InvestConfig::default();
        config.tavily_api_key = api_key.map(str::to_string);
        TavilySearchTool::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_short_query() {
        let out = tool(Some("key")).execute(json!({"query": "ab"})).await.unwrap();
        assert_eq!(out, Value::String(QUERY_TOO_SHORT.to_string()));
    }

    #[tokio::test]
    async fn test_missing_key_is_reported_as_text() {
        let out = tool(None).execute(json!({"query": "NVIDIA"})).await.unwrap();
        let text = out.as_str().unwrap();
        assert!(text.starts_with("Error performing search:"), "{text}");
        assert!(text.contains("TAVILY_API_KEY"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_reported_as_text() {
        let tool = tool(Some("key")).with_endpoint("http://127.0.0.1:9/search");
        let out = tool.search("Tesla", 5).await;
        assert!(out.starts_with("Error performing search:"));
    }

    #[tokio::test]
    async fn test_malformed_call_is_an_error() {
        assert!(tool(Some("key")).execute(json!({"q": "x"})).await.is_err());
    }

    #[test]
    fn test_clean_results() {
        let long = "x".repeat(800);
        let response = json!({
            "results": [
                {"title": "Tesla Q3", "url": "https://a.example", "content": long, "published_date": "2024-10-23"},
                {"url": "https://b.example", "content": "short"},
                {"title": "no url", "content": "dropped"},
                {"title": "no content", "url": "https://c.example"}
            ]
        });

        let hits = clean_results(&response, 5);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].content.chars().count(), 503);
        assert!(hits[0].content.ends_with("..."));
        assert_eq!(hits[1].title, "No title");
        assert_eq!(hits[1].published_date, "Unknown");
        assert_eq!(hits[1].content, "short...");

        assert_eq!(clean_results(&response, 1).len(), 1);
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        let text = "é".repeat(600);
        assert_eq!(preview(&text).chars().count(), 500);
    }

    #[test]
    fn test_empty_response() {
        assert!(response_is_empty(&json!({"results": []})));
        assert!(response_is_empty(&json!({})));
        assert!(!response_is_empty(&json!({"results": [{}]})));
    }

    #[test]
    fn test_render_results() {
        let hits = vec![SearchHit {
            title: "t".to_string(),
            url: "u".to_string(),
            content: "c...".to_string(),
            published_date: "Unknown".to_string(),
        }];
        let rendered: Value = serde_json::from_str(&render_results("Tesla", &hits)).unwrap();
        assert_eq!(rendered["query"], "Tesla");
        assert_eq!(rendered["results"][0]["url"], "u");
        assert!(rendered["date"].is_string());
    }

    #[test]
    fn test_schema() {
        let schema = tool(None).input_schema();
        assert_eq!(schema["required"][0], "query");
    }
}

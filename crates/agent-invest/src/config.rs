//! Configuration for the investment pipeline

use crate::error::{InvestError, Result};
use agent_llm::providers::openai::GROQ_API_BASE;
use agent_utils::{env_parse, env_var};
use std::path::PathBuf;
use std::time::Duration;

/// Default reasoning model
pub const DEFAULT_MODEL: &str = "llama3-70b-8192";

const HISTORY_RANGES: &[&str] = &["1mo", "3mo", "6mo", "1y", "2y", "5y", "10y", "ytd", "max"];
const SEARCH_DEPTHS: &[&str] = &["basic", "advanced"];

/// Configuration for the investment pipeline and its collaborators
#[derive(Debug, Clone)]
pub struct InvestConfig {
    /// Model id sent to the LLM provider
    pub model: String,

    /// OpenAI-compatible API base
    pub api_base: String,

    /// LLM API key
    pub llm_api_key: Option<String>,

    /// Timeout for LLM and data requests
    pub request_timeout: Duration,

    /// Sampling temperature for roles that do not set their own
    pub temperature: f32,

    /// Maximum model calls per stage
    pub max_iterations: usize,

    /// Tavily API key for the research role's web search
    pub tavily_api_key: Option<String>,

    /// Results requested per search
    pub search_max_results: usize,

    /// Tavily search depth ("basic" or "advanced")
    pub search_depth: String,

    /// Price history range for market snapshots
    pub history_range: String,

    /// Most recent analyst recommendation rows kept in a snapshot
    pub recommendation_rows: usize,

    /// Directory reports are written to
    pub report_dir: PathBuf,
}

impl Default for InvestConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_base: GROQ_API_BASE.to_string(),
            llm_api_key: None,
            request_timeout: Duration::from_secs(120),
            temperature: agent_llm::completion::DEFAULT_TEMPERATURE,
            max_iterations: 6,
            tavily_api_key: None,
            search_max_results: 5,
            search_depth: "advanced".to_string(),
            history_range: "1y".to_string(),
            recommendation_rows: 5,
            report_dir: PathBuf::from("."),
        }
    }
}

impl InvestConfig {
    /// Create a new configuration builder
    pub fn builder() -> InvestConfigBuilder {
        InvestConfigBuilder::default()
    }

    /// Load configuration from environment variables
    ///
    /// Call [`agent_utils::load_dotenv`] first to pick up a `.env` file.
    pub fn from_env() -> Result<Self> {
        InvestConfigBuilder::default().with_env()?.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(InvestError::Config("model must not be empty".to_string()));
        }

        if !self.api_base.starts_with("http://") && !self.api_base.starts_with("https://") {
            return Err(InvestError::Config(format!(
                "api_base must be an http(s) URL, got '{}'",
                self.api_base
            )));
        }

        if self.request_timeout.is_zero() {
            return Err(InvestError::Config(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(InvestError::Config(format!(
                "temperature must be between 0 and 2, got {}",
                self.temperature
            )));
        }

        if self.max_iterations == 0 {
            return Err(InvestError::Config(
                "max_iterations must be greater than 0".to_string(),
            ));
        }

        if !(1..=20).contains(&self.search_max_results) {
            return Err(InvestError::Config(
                "search_max_results must be between 1 and 20".to_string(),
            ));
        }

        if !SEARCH_DEPTHS.contains(&self.search_depth.as_str()) {
            return Err(InvestError::Config(format!(
                "unknown search depth '{}'",
                self.search_depth
            )));
        }

        if !HISTORY_RANGES.contains(&self.history_range.as_str()) {
            return Err(InvestError::Config(format!(
                "unknown history range '{}'",
                self.history_range
            )));
        }

        if self.recommendation_rows == 0 {
            return Err(InvestError::Config(
                "recommendation_rows must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for InvestConfig
#[derive(Debug, Default)]
pub struct InvestConfigBuilder {
    model: Option<String>,
    api_base: Option<String>,
    llm_api_key: Option<String>,
    request_timeout: Option<Duration>,
    temperature: Option<f32>,
    max_iterations: Option<usize>,
    tavily_api_key: Option<String>,
    search_max_results: Option<usize>,
    search_depth: Option<String>,
    history_range: Option<String>,
    recommendation_rows: Option<usize>,
    report_dir: Option<PathBuf>,
}

impl InvestConfigBuilder {
    /// Set the model id
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the OpenAI-compatible API base
    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into().trim_end_matches('/').to_string());
        self
    }

    /// Set the LLM API key
    pub fn llm_api_key(mut self, key: impl Into<String>) -> Self {
        self.llm_api_key = Some(key.into());
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the fallback temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set maximum model calls per stage
    pub fn max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = Some(max);
        self
    }

    /// Set the Tavily API key
    pub fn tavily_api_key(mut self, key: impl Into<String>) -> Self {
        self.tavily_api_key = Some(key.into());
        self
    }

    /// Set results requested per search
    pub fn search_max_results(mut self, n: usize) -> Self {
        self.search_max_results = Some(n);
        self
    }

    /// Set the search depth
    pub fn search_depth(mut self, depth: impl Into<String>) -> Self {
        self.search_depth = Some(depth.into());
        self
    }

    /// Set the price history range
    pub fn history_range(mut self, range: impl Into<String>) -> Self {
        self.history_range = Some(range.into());
        self
    }

    /// Set the number of recommendation rows kept
    pub fn recommendation_rows(mut self, n: usize) -> Self {
        self.recommendation_rows = Some(n);
        self
    }

    /// Set the report output directory
    pub fn report_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.report_dir = Some(dir.into());
        self
    }

    /// Fill unset fields from the environment
    ///
    /// `GROQ_API_KEY` wins over `OPENAI_API_KEY`; an OpenAI key without an
    /// explicit `INVEST_LLM_API_BASE` switches the base to OpenAI.
    pub fn with_env(mut self) -> Result<Self> {
        if self.llm_api_key.is_none() {
            if let Some(key) = env_var("GROQ_API_KEY") {
                self.llm_api_key = Some(key);
            } else if let Some(key) = env_var("OPENAI_API_KEY") {
                self.llm_api_key = Some(key);
                if self.api_base.is_none() && env_var("INVEST_LLM_API_BASE").is_none() {
                    self = self.api_base(
                        env_var("OPENAI_API_BASE")
                            .unwrap_or_else(|| agent_llm::providers::openai::OPENAI_API_BASE.to_string()),
                    );
                }
            }
        }

        if self.api_base.is_none() {
            if let Some(base) = env_var("INVEST_LLM_API_BASE") {
                self = self.api_base(base);
            }
        }

        if self.model.is_none() {
            self.model = env_var("INVEST_MODEL");
        }

        if self.tavily_api_key.is_none() {
            self.tavily_api_key = env_var("TAVILY_API_KEY");
        }

        if self.report_dir.is_none() {
            self.report_dir = env_var("INVEST_REPORT_DIR").map(PathBuf::from);
        }

        if self.request_timeout.is_none() {
            self.request_timeout = env_parse::<u64>("INVEST_REQUEST_TIMEOUT_SECS")?.map(Duration::from_secs);
        }

        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> Result<InvestConfig> {
        let defaults = InvestConfig::default();

        let config = InvestConfig {
            model: self.model.unwrap_or(defaults.model),
            api_base: self.api_base.unwrap_or(defaults.api_base),
            llm_api_key: self.llm_api_key,
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            temperature: self.temperature.unwrap_or(defaults.temperature),
            max_iterations: self.max_iterations.unwrap_or(defaults.max_iterations),
            tavily_api_key: self.tavily_api_key,
            search_max_results: self.search_max_results.unwrap_or(defaults.search_max_results),
            search_depth: self.search_depth.unwrap_or(defaults.search_depth),
            history_range: self.history_range.unwrap_or(defaults.history_range),
            recommendation_rows: self.recommendation_rows.unwrap_or(defaults.recommendation_rows),
            report_dir: self.report_dir.unwrap_or(defaults.report_dir),
        };

        config.validate()?;
        Ok(config)
    }
}

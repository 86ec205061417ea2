//! Staged investment analysis
//!
//! Turns a free-text query such as `"Analyze Tesla's financial position (TSLA)"`
//! into a multi-section report:
//!
//! 1. [`EntityExtractor`] finds a ticker and/or company name
//! 2. the research role gathers qualitative data (with web search)
//! 3. if a ticker was found, a [`MarketDataGateway`] snapshot is analyzed
//!    by the finance role
//! 4. the synthesis role combines both
//! 5. the editorial role compiles the final report
//!
//! [`PipelineOrchestrator::run`] returns a [`PipelineResult`] for every
//! query; a [`ReportSink`] displays and persists it.
//!
//! ```no_run
//! use agent_invest::{ConsoleReportSink, InvestConfig, PipelineOrchestrator, ReportSink};
//! use agent_llm::providers::{OpenAIConfig, OpenAIProvider};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = InvestConfig::from_env()?;
//! let provider = OpenAIProvider::with_config(
//!     OpenAIConfig::groq(config.llm_api_key.clone().unwrap_or_default())
//!         .with_api_base(&config.api_base),
//! )?;
//! let pipeline = PipelineOrchestrator::from_config(&config, Arc::new(provider))?;
//!
//! let result = pipeline.run("Research on NVIDIA Corporation (NVDA)").await;
//! ConsoleReportSink::new(&config.report_dir).emit(&result)?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod extractor;
pub mod market;
pub mod observer;
pub mod pipeline;
pub mod prompts;
pub mod report;
pub mod result;
pub mod roles;
pub mod tools;

pub use config::{InvestConfig, InvestConfigBuilder};
pub use error::{InvestError, Result};
pub use extractor::{EntityExtractor, ExtractedEntities};
pub use market::{MarketDataGateway, MarketSnapshot, YahooFinanceGateway};
pub use observer::{NoopObserver, PipelineObserver, PipelineStep};
pub use pipeline::{EXTRACTION_FAILED, PipelineOrchestrator, PipelineOrchestratorBuilder};
pub use report::{ConsoleReportSink, JsonReportSink, ReportSink};
pub use result::{PipelineResult, PipelineStatus, Stage, StageResult, StageStatus};
pub use roles::RoleSet;
pub use tools::TavilySearchTool;

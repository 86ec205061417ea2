//! Investment analyst CLI
//!
//! Runs the staged analysis pipeline for free-text queries, either
//! interactively or once with `--query`.
//!
//! # Usage
//!
//! ```bash
//! export GROQ_API_KEY="gsk_..."
//! export TAVILY_API_KEY="tvly-..."
//!
//! cargo run --bin invest-analyst
//! cargo run --bin invest-analyst -- --query "Evaluate Apple stock (AAPL)"
//! ```

mod progress;
mod repl;

use agent_invest::{
    ConsoleReportSink, InvestConfig, JsonReportSink, PipelineOrchestrator, ReportSink,
};
use agent_llm::providers::openai::GROQ_API_BASE;
use agent_llm::providers::{OpenAIConfig, OpenAIProvider};
use anyhow::Context;
use clap::Parser;
use progress::ConsoleProgress;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "invest-analyst", version)]
#[command(about = "Investment analysis reports from free-text queries", long_about = None)]
struct Args {
    /// Model id for all reasoning stages
    #[arg(long, env = "INVEST_MODEL")]
    model: Option<String>,

    /// OpenAI-compatible API base URL
    #[arg(long, env = "INVEST_LLM_API_BASE")]
    api_base: Option<String>,

    /// Directory reports are saved to
    #[arg(short, long, env = "INVEST_REPORT_DIR")]
    output_dir: Option<PathBuf>,

    /// Run a single query and exit
    #[arg(short, long)]
    query: Option<String>,

    /// Do not save reports to disk
    #[arg(long)]
    no_save: bool,

    /// Print the full result record as JSON
    #[arg(long)]
    json: bool,
}

impl Args {
    fn config(&self) -> anyhow::Result<InvestConfig> {
        let mut builder = InvestConfig::builder();
        if let Some(model) = &self.model {
            builder = builder.model(model);
        }
        if let Some(api_base) = &self.api_base {
            builder = builder.api_base(api_base);
        }
        if let Some(dir) = &self.output_dir {
            builder = builder.report_dir(dir);
        }
        Ok(builder.with_env()?.build()?)
    }

    fn sink(&self, config: &InvestConfig) -> Box<dyn ReportSink> {
        match (self.json, self.no_save) {
            (true, true) => Box::new(JsonReportSink::new()),
            (true, false) => Box::new(JsonReportSink::saving_to(&config.report_dir)),
            (false, true) => Box::new(ConsoleReportSink::without_saving()),
            (false, false) => Box::new(ConsoleReportSink::new(&config.report_dir)),
        }
    }
}

fn provider(config: &InvestConfig) -> anyhow::Result<OpenAIProvider> {
    let api_key = config
        .llm_api_key
        .clone()
        .context("GROQ_API_KEY (or OPENAI_API_KEY) must be set")?;

    let mut provider_config = OpenAIConfig::groq(api_key)
        .with_api_base(&config.api_base)
        .with_timeout(config.request_timeout.as_secs());
    if config.api_base != GROQ_API_BASE {
        provider_config.provider_name = "openai-compatible".to_string();
    }

    Ok(OpenAIProvider::with_config(provider_config)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    agent_utils::load_dotenv();
    agent_utils::init_tracing();

    let args = Args::parse();
    let config = args.config()?;
    if config.tavily_api_key.is_none() {
        eprintln!("Warning: TAVILY_API_KEY not set, research will run without web search");
    }

    let pipeline = PipelineOrchestrator::builder_from_config(&config, Arc::new(provider(&config)?))?
        .observer(Arc::new(ConsoleProgress::new(args.json)))
        .build()?;
    let sink = args.sink(&config);

    info!(model = %config.model, api_base = %config.api_base, "Starting invest-analyst");

    if let Some(query) = &args.query {
        let result = pipeline.run(query).await;
        sink.emit(&result)?;
        return Ok(if result.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    repl::print_banner();
    repl::run(&pipeline, sink.as_ref()).await?;
    Ok(ExitCode::SUCCESS)
}

//! Step-by-step progress lines for the terminal

use agent_invest::{PipelineObserver, PipelineStep};

/// Prints one line per pipeline step
///
/// Goes to stderr when stdout carries machine-readable output.
pub struct ConsoleProgress {
    to_stderr: bool,
}

impl ConsoleProgress {
    pub fn new(to_stderr: bool) -> Self {
        Self { to_stderr }
    }

    fn line(&self, text: &str) {
        if self.to_stderr {
            eprintln!("{text}");
        } else {
            println!("{text}");
        }
    }
}

pub fn step_message(step: PipelineStep) -> &'static str {
    match step {
        PipelineStep::Research => "🔍 Step 1: Research Agent Running...",
        PipelineStep::MarketData => "📊 Step 2: Fetching Financial Data...",
        PipelineStep::QuantitativeAnalysis => "📈 Step 2a: Finance Agent Analyzing...",
        PipelineStep::InvestmentAnalysis => "📈 Step 3: Analysis Agent Running...",
        PipelineStep::Editorial => "📝 Step 4: Editor Agent Compiling Report...",
    }
}

impl PipelineObserver for ConsoleProgress {
    fn on_run_started(&self, company: &str, ticker: Option<&str>) {
        self.line(&format!(
            "\n🔍 Analyzing: {company} ({})",
            ticker.unwrap_or("no ticker")
        ));
    }

    fn on_stage_started(&self, step: PipelineStep) {
        self.line(step_message(step));
    }

    fn on_stage_finished(&self, step: PipelineStep, succeeded: bool) {
        if !succeeded {
            self.line(&format!("⚠️  {step} step failed"));
        }
    }
}

//! Progress hooks for pipeline runs

use std::fmt;

/// Steps a run goes through, including ones that are not stage entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStep {
    Research,
    MarketData,
    QuantitativeAnalysis,
    InvestmentAnalysis,
    Editorial,
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PipelineStep::Research => "research",
            PipelineStep::MarketData => "market_data",
            PipelineStep::QuantitativeAnalysis => "quantitative_analysis",
            PipelineStep::InvestmentAnalysis => "investment_analysis",
            PipelineStep::Editorial => "editorial",
        })
    }
}

/// Receives progress notifications from the orchestrator
///
/// All methods default to doing nothing.
pub trait PipelineObserver: Send + Sync {
    /// Entities were resolved and the run is starting
    fn on_run_started(&self, _company: &str, _ticker: Option<&str>) {}

    fn on_stage_started(&self, _step: PipelineStep) {}

    fn on_stage_finished(&self, _step: PipelineStep, _succeeded: bool) {}
}

/// Observer that ignores every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

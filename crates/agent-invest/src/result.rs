//! Pipeline result types

use crate::market::MarketSnapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;
use uuid::Uuid;

/// Tracked pipeline stages, in pipeline order
///
/// Editorial compilation is not a stage entry; its output is the final report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    QualitativeResearch,
    QuantitativeAnalysis,
    InvestmentAnalysis,
}

impl Stage {
    pub const ALL: [Stage; 3] = [
        Stage::QualitativeResearch,
        Stage::QuantitativeAnalysis,
        Stage::InvestmentAnalysis,
    ];

    /// Key used in serialized results
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::QualitativeResearch => "qualitative_research",
            Stage::QuantitativeAnalysis => "quantitative_analysis",
            Stage::InvestmentAnalysis => "investment_analysis",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Completed,
    Failed,
    Skipped,
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StageStatus::Completed => "completed",
            StageStatus::Failed => "failed",
            StageStatus::Skipped => "skipped",
        })
    }
}

/// Outcome of one stage
///
/// `output` is always text, even for failed or skipped stages, so later
/// stages can use it without checking the status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageResult {
    pub output: String,
    pub status: StageStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_data: Option<MarketSnapshot>,
}

impl StageResult {
    pub fn completed(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            status: StageStatus::Completed,
            raw_data: None,
        }
    }

    pub fn failed(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            status: StageStatus::Failed,
            raw_data: None,
        }
    }

    pub fn skipped(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            status: StageStatus::Skipped,
            raw_data: None,
        }
    }

    pub fn with_raw_data(mut self, snapshot: MarketSnapshot) -> Self {
        self.raw_data = Some(snapshot);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    /// Run still in progress
    Running,
    Success,
    Failed,
}

/// The record a single pipeline run accumulates
///
/// `Running` is only seen while a record is being built by hand.
/// [`PipelineOrchestrator::run`](crate::PipelineOrchestrator::run) always
/// returns a terminal record: `success` with a final report, or `failed`
/// with an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    pub run_id: Uuid,
    pub company: String,
    pub ticker: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub stages: BTreeMap<Stage, StageResult>,
    pub final_report: Option<String>,
    pub status: PipelineStatus,
    pub error: Option<String>,
}

impl PipelineResult {
    /// Start a run record for the resolved company and ticker
    pub fn new(company: impl Into<String>, ticker: Option<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            company: company.into(),
            ticker,
            timestamp: Utc::now(),
            stages: BTreeMap::new(),
            final_report: None,
            status: PipelineStatus::Running,
            error: None,
        }
    }

    /// Terminal record for a query that named nothing
    pub fn extraction_failed(message: impl Into<String>) -> Self {
        let mut result = Self::new("", None);
        result.fail(message);
        result
    }

    /// Record a stage outcome
    ///
    /// Entries are write-once and must arrive in pipeline order; anything
    /// else is ignored with a warning. Returns whether the entry was stored.
    pub fn record_stage(&mut self, stage: Stage, result: StageResult) -> bool {
        if self.is_terminal() {
            warn!(%stage, "Ignoring stage result for a finished run");
            return false;
        }
        if let Some((&last, _)) = self.stages.last_key_value() {
            if last >= stage {
                warn!(%stage, last = %last, "Ignoring out-of-order stage result");
                return false;
            }
        }
        self.stages.insert(stage, result);
        true
    }

    pub fn stage(&self, stage: Stage) -> Option<&StageResult> {
        self.stages.get(&stage)
    }

    /// Output text of a stage, if it ran
    pub fn stage_output(&self, stage: Stage) -> Option<&str> {
        self.stage(stage).map(|s| s.output.as_str())
    }

    /// Mark the run successful with its final report
    pub fn succeed(&mut self, final_report: impl Into<String>) {
        if self.is_terminal() {
            return;
        }
        self.final_report = Some(final_report.into());
        self.status = PipelineStatus::Success;
    }

    /// Mark the run failed; stages recorded so far are kept
    pub fn fail(&mut self, error: impl Into<String>) {
        if self.is_terminal() {
            return;
        }
        self.error = Some(error.into());
        self.status = PipelineStatus::Failed;
    }

    pub fn is_terminal(&self) -> bool {
        self.status != PipelineStatus::Running
    }

    pub fn is_success(&self) -> bool {
        self.status == PipelineStatus::Success
    }
}

//! Report rendering and persistence

use crate::error::Result;
use crate::result::{PipelineResult, Stage};
use comfy_table::{Table, presets};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const RULE_WIDTH: usize = 80;

/// Byte cap on the company part of a report file name
const MAX_COMPANY_BYTES: usize = 100;

/// Displays a finished run and persists its report
pub trait ReportSink: Send + Sync {
    /// Emit `result`; returns the path of the saved report, if one was written
    fn emit(&self, result: &PipelineResult) -> Result<Option<PathBuf>>;
}

/// File name for a run's report: company with whitespace replaced by `_`
/// (cut to [`MAX_COMPANY_BYTES`] on a char boundary) plus the run's
/// generation time
pub fn report_file_name(result: &PipelineResult) -> String {
    let mut company = String::new();
    for c in result
        .company
        .chars()
        .filter(|c| !matches!(c, '/' | '\\'))
        .map(|c| if c.is_whitespace() { '_' } else { c })
    {
        if company.len() + c.len_utf8() > MAX_COMPANY_BYTES {
            break;
        }
        company.push(c);
    }

    format!(
        "investment_report_{company}_{}.md",
        result.timestamp.format("%Y%m%d_%H%M%S")
    )
}

/// Write the final report under `dir`; failed runs write nothing
pub fn save_report(dir: &Path, result: &PipelineResult) -> Result<Option<PathBuf>> {
    let Some(report) = result.final_report.as_deref().filter(|_| result.is_success()) else {
        return Ok(None);
    };

    fs::create_dir_all(dir)?;
    let path = dir.join(report_file_name(result));
    fs::write(&path, report)?;

    info!(path = %path.display(), "Report saved");
    Ok(Some(path))
}

/// Stage status table
pub fn stage_table(result: &PipelineResult) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL).set_header(vec!["Stage", "Status"]);

    for stage in Stage::ALL {
        let status = result
            .stage(stage)
            .map_or_else(|| "not run".to_string(), |s| s.status.to_string());
        table.add_row(vec![stage.to_string(), status]);
    }
    table
}

/// Human-readable terminal output with optional markdown persistence
#[derive(Debug, Clone)]
pub struct ConsoleReportSink {
    output_dir: Option<PathBuf>,
}

impl ConsoleReportSink {
    /// Print and save reports into `output_dir`
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: Some(output_dir.into()),
        }
    }

    /// Print only
    pub fn without_saving() -> Self {
        Self { output_dir: None }
    }

    /// The text printed for `result`
    pub fn render(&self, result: &PipelineResult) -> String {
        if let (false, Some(error)) = (result.is_success(), result.error.as_deref()) {
            return format!("\n❌ Error: {error}");
        }

        let rule = "=".repeat(RULE_WIDTH);
        let mut out = String::new();
        out.push('\n');
        out.push_str(&rule);
        out.push('\n');
        out.push_str(&format!(
            "📑 FINAL INVESTMENT REPORT: {} ({})\n",
            result.company,
            result.ticker.as_deref().unwrap_or("no ticker")
        ));
        out.push_str(&rule);
        out.push('\n');
        out.push_str(result.final_report.as_deref().unwrap_or_default());
        out.push_str("\n\n");
        out.push_str(&rule);
        out.push('\n');
        out.push_str(&format!(
            "📅 Report generated on: {}\n",
            result.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        out.push_str(&rule);
        out.push('\n');
        out.push_str(&stage_table(result).to_string());
        out.push('\n');
        out
    }
}

impl ReportSink for ConsoleReportSink {
    fn emit(&self, result: &PipelineResult) -> Result<Option<PathBuf>> {
        println!("{}", self.render(result));

        let Some(dir) = &self.output_dir else {
            return Ok(None);
        };
        let saved = save_report(dir, result)?;
        if let Some(path) = &saved {
            println!("💾 Report saved to: {}", path.display());
        }
        Ok(saved)
    }
}

/// Prints the whole result record as JSON
#[derive(Debug, Clone, Default)]
pub struct JsonReportSink {
    output_dir: Option<PathBuf>,
}

impl JsonReportSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also save the markdown report into `dir`
    pub fn saving_to(dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: Some(dir.into()),
        }
    }
}

impl ReportSink for JsonReportSink {
    fn emit(&self, result: &PipelineResult) -> Result<Option<PathBuf>> {
        println!("{}", serde_json::to_string_pretty(result)?);
        match &self.output_dir {
            Some(dir) => save_report(dir, result),
            None => Ok(None),
        }
    }
}

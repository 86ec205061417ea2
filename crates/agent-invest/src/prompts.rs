//! Stage prompt templates

use crate::error::Result;
use crate::market::MarketSnapshot;
use minijinja::Environment;
use serde_json::{Value, json};

/// Output recorded for the quantitative stage when the query has no ticker
pub const SKIPPED_QUANTITATIVE: &str = "No ticker provided - skipping quantitative analysis";

const RESEARCH: &str = "Comprehensive financial research on {{ company }}";

const QUANTITATIVE: &str = "Analyze these financial metrics: {{ snapshot }}";

const INVESTMENT_ANALYSIS: &str = "Qualitative Research:
{{ research }}

Quantitative Analysis:
{{ quantitative }}";

const EDITORIAL: &str = "Qualitative Research Summary:
{{ research }}

Financial Analysis:
{{ quantitative }}

Investment Analysis:
{{ analysis }}

Report Date: {{ report_date }}";

fn render(template: &str, vars: &Value) -> Result<String> {
    let env = Environment::new();
    Ok(env.render_str(template, vars)?)
}

pub fn research(company: &str) -> Result<String> {
    render(RESEARCH, &json!({ "company": company }))
}

/// Prompt carrying the whole snapshot as pretty JSON
pub fn quantitative(snapshot: &MarketSnapshot) -> Result<String> {
    let snapshot = serde_json::to_string_pretty(snapshot)?;
    render(QUANTITATIVE, &json!({ "snapshot": snapshot }))
}

pub fn investment_analysis(research: &str, quantitative: &str) -> Result<String> {
    render(
        INVESTMENT_ANALYSIS,
        &json!({ "research": research, "quantitative": quantitative }),
    )
}

/// `report_date` is rendered verbatim, normally `YYYY-MM-DD`
pub fn editorial(research: &str, quantitative: &str, analysis: &str, report_date: &str) -> Result<String> {
    render(
        EDITORIAL,
        &json!({
            "research": research,
            "quantitative": quantitative,
            "analysis": analysis,
            "report_date": report_date,
        }),
    )
}

//! Market snapshot types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything the quantitative stage knows about one ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub ticker: String,
    pub company_name: String,
    pub current_price: Option<f64>,
    pub currency: String,
    pub financials: FinancialStatements,
    pub key_metrics: KeyMetrics,
    pub analyst_data: AnalystData,
    pub ownership: Ownership,
    pub historical_data: Vec<PricePoint>,
}

impl MarketSnapshot {
    /// Empty snapshot: name defaults to the ticker, currency to USD
    pub fn new(ticker: impl Into<String>) -> Self {
        let ticker = ticker.into();
        Self {
            company_name: ticker.clone(),
            ticker,
            current_price: None,
            currency: "USD".to_string(),
            financials: FinancialStatements::default(),
            key_metrics: KeyMetrics::default(),
            analyst_data: AnalystData::default(),
            ownership: Ownership::default(),
            historical_data: Vec::new(),
        }
    }
}

/// Annual statements, most recent first; any table may be empty
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialStatements {
    pub income_statement: Vec<StatementPeriod>,
    pub balance_sheet: Vec<StatementPeriod>,
    pub cash_flow: Vec<StatementPeriod>,
}

/// One reporting period of a statement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatementPeriod {
    pub end_date: Option<String>,
    pub items: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyMetrics {
    pub pe_ratio: Option<f64>,
    pub forward_pe: Option<f64>,
    pub peg_ratio: Option<f64>,
    pub price_to_book: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub profit_margins: Option<f64>,
    pub dividend_yield: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalystData {
    pub recommendations: Vec<Recommendation>,
    pub target_price: Option<f64>,
    pub recommendation_mean: Option<f64>,
}

/// Analyst rating counts for one period (e.g. "0m", "-1m")
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub period: String,
    pub strong_buy: u32,
    pub buy: u32,
    pub hold: u32,
    pub sell: u32,
    pub strong_sell: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ownership {
    pub major_holders: Vec<MajorHolder>,
    pub institutional_holders: Vec<InstitutionalHolder>,
}

/// One row of the major-holder breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MajorHolder {
    pub breakdown: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstitutionalHolder {
    pub holder: String,
    pub shares: Option<f64>,
    pub pct_held: Option<f64>,
    pub value: Option<f64>,
    pub date_reported: Option<String>,
}

/// Daily price bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub adj_close: f64,
}

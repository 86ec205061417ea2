//! Yahoo Finance gateway
//!
//! Price history comes from the chart API through `yahoo_finance_api`;
//! name, price, ratios, analyst data, holders and statements come from the
//! `quoteSummary` endpoint. That endpoint only answers requests that carry
//! Yahoo's session cookie and the matching `crumb` parameter, so the gateway
//! keeps a cookie store and caches the crumb until Yahoo rejects it.

use super::snapshot::{
    AnalystData, FinancialStatements, InstitutionalHolder, KeyMetrics, MajorHolder, MarketSnapshot,
    Ownership, PricePoint, Recommendation, StatementPeriod,
};
use super::{MarketDataGateway, validate_ticker};
use crate::config::InvestConfig;
use crate::error::{InvestError, Result};
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde_json::Value;
use reqwest::StatusCode;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, instrument, warn};
use yahoo_finance_api as yahoo;

const QUOTE_SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";

const SUMMARY_MODULES: &str = "price,summaryDetail,defaultKeyStatistics,financialData,\
recommendationTrend,majorHoldersBreakdown,institutionOwnership,\
incomeStatementHistory,balanceSheetHistory,cashflowStatementHistory";

/// Any Yahoo page that sets the `A3` session cookie
const COOKIE_URL: &str = "https://fc.yahoo.com";
const CRUMB_URL: &str = "https://query1.finance.yahoo.com/v1/test/getcrumb";

const USER_AGENT: &str = "Mozilla/5.0 (compatible; invest-analyst/0.1)";

/// [`MarketDataGateway`] backed by Yahoo Finance
#[derive(Debug, Clone)]
pub struct YahooFinanceGateway {
    client: Client,
    crumb: Arc<Mutex<Option<String>>>,
    history_range: String,
    recommendation_rows: usize,
}

impl YahooFinanceGateway {
    /// Gateway with a one-year daily history and five recommendation rows
    pub fn new() -> Result<Self> {
        Self::with_options("1y", 5, Duration::from_secs(30))
    }

    pub fn from_config(config: &InvestConfig) -> Result<Self> {
        Self::with_options(
            &config.history_range,
            config.recommendation_rows,
            config.request_timeout,
        )
    }

    fn with_options(history_range: &str, recommendation_rows: usize, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            crumb: Arc::new(Mutex::new(None)),
            history_range: history_range.to_string(),
            recommendation_rows,
        })
    }

    async fn fetch_history(&self, ticker: &str) -> Result<Vec<PricePoint>> {
        let provider =
            yahoo::YahooConnector::new().map_err(|e| InvestError::YahooFinance(e.to_string()))?;

        let response = provider
            .get_quote_range(ticker, "1d", &self.history_range)
            .await
            .map_err(|e| InvestError::YahooFinance(e.to_string()))?;

        let quotes = response
            .quotes()
            .map_err(|e| InvestError::YahooFinance(e.to_string()))?;

        Ok(quotes
            .iter()
            .filter_map(|q| {
                Some(PricePoint {
                    date: DateTime::from_timestamp(q.timestamp as i64, 0)?,
                    open: q.open,
                    high: q.high,
                    low: q.low,
                    close: q.close,
                    volume: q.volume,
                    adj_close: q.adjclose,
                })
            })
            .collect())
    }

    fn cached_crumb(&self) -> Option<String> {
        self.crumb.lock().ok().and_then(|guard| guard.clone())
    }

    fn store_crumb(&self, crumb: Option<String>) {
        if let Ok(mut guard) = self.crumb.lock() {
            *guard = crumb;
        }
    }

    /// Crumb for the current session, fetching cookie and crumb when none is cached
    async fn crumb(&self) -> Result<String> {
        if let Some(crumb) = self.cached_crumb() {
            return Ok(crumb);
        }

        // The cookie page answers 404 but still sets the session cookie.
        self.client.get(COOKIE_URL).send().await?;

        let response = self.client.get(CRUMB_URL).send().await?;
        let status = response.status();
        let crumb = response.text().await?.trim().to_string();
        if !status.is_success() || crumb.is_empty() || crumb.contains(' ') {
            return Err(InvestError::YahooFinance(format!(
                "failed to obtain crumb: HTTP {status}"
            )));
        }

        debug!("Obtained Yahoo crumb");
        self.store_crumb(Some(crumb.clone()));
        Ok(crumb)
    }

    fn summary_request(&self, ticker: &str, crumb: &str) -> Result<reqwest::Request> {
        Ok(self
            .client
            .get(format!("{QUOTE_SUMMARY_URL}/{ticker}"))
            .query(&[("modules", SUMMARY_MODULES), ("crumb", crumb)])
            .build()?)
    }

    async fn fetch_summary(&self, ticker: &str) -> Result<Value> {
        let mut refreshed = false;
        loop {
            let crumb = self.crumb().await?;
            let response = self
                .client
                .execute(self.summary_request(ticker, &crumb)?)
                .await?;
            let status = response.status();

            if status.is_success() {
                let data: Value = response.json().await?;
                return summary_result(data);
            }

            let body = response.text().await.unwrap_or_default();
            if !refreshed && crumb_rejected(status, &body) {
                warn!(%status, "Yahoo rejected the crumb, refreshing session");
                self.store_crumb(None);
                refreshed = true;
                continue;
            }

            return Err(InvestError::YahooFinance(format!("HTTP error: {status}")));
        }
    }
}

/// Yahoo answers a stale or missing crumb with 401 or an "Invalid Crumb" body
fn crumb_rejected(status: StatusCode, body: &str) -> bool {
    status == StatusCode::UNAUTHORIZED
        || body.contains("Invalid Crumb")
        || body.contains("Invalid Cookie")
}

#[async_trait]
impl MarketDataGateway for YahooFinanceGateway {
    #[instrument(skip(self))]
    async fn fetch(&self, ticker: &str) -> Result<MarketSnapshot> {
        if !validate_ticker(ticker) {
            return Err(InvestError::InvalidTicker(ticker.to_string()));
        }

        let load = async {
            let summary = self.fetch_summary(ticker).await?;
            let history = self.fetch_history(ticker).await?;
            Ok::<_, InvestError>(build_snapshot(
                ticker,
                &summary,
                history,
                self.recommendation_rows,
            ))
        };

        let snapshot = load
            .await
            .map_err(|e| InvestError::MarketData(e.to_string()))?;

        debug!(
            company = %snapshot.company_name,
            history_points = snapshot.historical_data.len(),
            "Fetched market snapshot"
        );
        Ok(snapshot)
    }
}

/// Unwrap `quoteSummary.result[0]`, surfacing Yahoo's own error description
fn summary_result(mut data: Value) -> Result<Value> {
    let summary = data
        .get_mut("quoteSummary")
        .map(Value::take)
        .ok_or_else(|| InvestError::YahooFinance("missing quoteSummary".to_string()))?;

    if let Some(error) = summary.get("error").filter(|e| !e.is_null()) {
        let description = error
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        return Err(InvestError::YahooFinance(description.to_string()));
    }

    summary
        .get("result")
        .and_then(|r| r.get(0))
        .cloned()
        .ok_or_else(|| InvestError::YahooFinance("empty quoteSummary result".to_string()))
}

fn build_snapshot(
    ticker: &str,
    summary: &Value,
    historical_data: Vec<PricePoint>,
    recommendation_rows: usize,
) -> MarketSnapshot {
    let mut snapshot = MarketSnapshot::new(ticker);

    if let Some(name) = text(summary, "price", "longName").or_else(|| text(summary, "price", "shortName")) {
        snapshot.company_name = name;
    }
    if let Some(currency) = text(summary, "price", "currency")
        .or_else(|| text(summary, "financialData", "financialCurrency"))
    {
        snapshot.currency = currency;
    }
    snapshot.current_price = raw_f64(summary, "financialData", "currentPrice")
        .or_else(|| raw_f64(summary, "price", "regularMarketPrice"));

    snapshot.key_metrics = KeyMetrics {
        pe_ratio: raw_f64(summary, "summaryDetail", "trailingPE"),
        forward_pe: raw_f64(summary, "summaryDetail", "forwardPE")
            .or_else(|| raw_f64(summary, "defaultKeyStatistics", "forwardPE")),
        peg_ratio: raw_f64(summary, "defaultKeyStatistics", "pegRatio"),
        price_to_book: raw_f64(summary, "defaultKeyStatistics", "priceToBook"),
        debt_to_equity: raw_f64(summary, "financialData", "debtToEquity"),
        return_on_equity: raw_f64(summary, "financialData", "returnOnEquity"),
        profit_margins: raw_f64(summary, "financialData", "profitMargins"),
        dividend_yield: raw_f64(summary, "summaryDetail", "dividendYield"),
    };

    snapshot.analyst_data = AnalystData {
        recommendations: recommendations(summary, recommendation_rows),
        target_price: raw_f64(summary, "financialData", "targetMeanPrice"),
        recommendation_mean: raw_f64(summary, "financialData", "recommendationMean"),
    };

    snapshot.ownership = Ownership {
        major_holders: major_holders(summary),
        institutional_holders: institutional_holders(summary),
    };

    snapshot.financials = FinancialStatements {
        income_statement: statements(summary, "incomeStatementHistory", "incomeStatementHistory"),
        balance_sheet: statements(summary, "balanceSheetHistory", "balanceSheetStatements"),
        cash_flow: statements(summary, "cashflowStatementHistory", "cashflowStatements"),
    };

    snapshot.historical_data = historical_data;
    snapshot
}

/// Numeric field that Yahoo wraps as `{"raw": .., "fmt": ..}` or sends bare
fn number(value: &Value) -> Option<f64> {
    value
        .get("raw")
        .and_then(Value::as_f64)
        .or_else(|| value.as_f64())
}

fn raw_f64(summary: &Value, module: &str, field: &str) -> Option<f64> {
    summary.get(module)?.get(field).and_then(number)
}

fn text(summary: &Value, module: &str, field: &str) -> Option<String> {
    summary
        .get(module)?
        .get(field)?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn count(row: &Value, field: &str) -> u32 {
    row.get(field)
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(0)
}

fn recommendations(summary: &Value, rows: usize) -> Vec<Recommendation> {
    let Some(trend) = summary
        .pointer("/recommendationTrend/trend")
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    trend
        .iter()
        .take(rows)
        .map(|row| Recommendation {
            period: row
                .get("period")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            strong_buy: count(row, "strongBuy"),
            buy: count(row, "buy"),
            hold: count(row, "hold"),
            sell: count(row, "sell"),
            strong_sell: count(row, "strongSell"),
        })
        .collect()
}

fn major_holders(summary: &Value) -> Vec<MajorHolder> {
    const ROWS: &[(&str, &str)] = &[
        ("insidersPercentHeld", "% of Shares Held by All Insider"),
        ("institutionsPercentHeld", "% of Shares Held by Institutions"),
        ("institutionsFloatPercentHeld", "% of Float Held by Institutions"),
        ("institutionsCount", "Number of Institutions Holding Shares"),
    ];

    ROWS.iter()
        .filter_map(|(field, label)| {
            raw_f64(summary, "majorHoldersBreakdown", field).map(|value| MajorHolder {
                breakdown: (*label).to_string(),
                value,
            })
        })
        .collect()
}

fn institutional_holders(summary: &Value) -> Vec<InstitutionalHolder> {
    let Some(list) = summary
        .pointer("/institutionOwnership/ownershipList")
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    list.iter()
        .filter_map(|row| {
            let holder = row.get("organization")?.as_str()?.to_string();
            Some(InstitutionalHolder {
                holder,
                shares: row.get("position").and_then(number),
                pct_held: row.get("pctHeld").and_then(number),
                value: row.get("value").and_then(number),
                date_reported: row
                    .pointer("/reportDate/fmt")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            })
        })
        .collect()
}

fn statements(summary: &Value, module: &str, list: &str) -> Vec<StatementPeriod> {
    let Some(periods) = summary
        .get(module)
        .and_then(|m| m.get(list))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    periods
        .iter()
        .filter_map(Value::as_object)
        .map(|period| {
            let items: BTreeMap<String, f64> = period
                .iter()
                .filter(|(key, _)| !matches!(key.as_str(), "maxAge" | "endDate"))
                .filter_map(|(key, value)| number(value).map(|n| (key.clone(), n)))
                .collect();

            StatementPeriod {
                end_date: period
                    .get("endDate")
                    .and_then(|d| d.get("fmt"))
                    .and_then(Value::as_str)
                    .map(str::to_string),
                items,
            }
        })
        .collect()
}

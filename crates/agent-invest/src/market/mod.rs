//! Market data gateway
//!
//! The quantitative stage asks a [`MarketDataGateway`] for a
//! [`MarketSnapshot`] of one ticker. [`YahooFinanceGateway`] is the
//! production implementation.

mod snapshot;
mod yahoo;

pub use snapshot::{
    AnalystData, FinancialStatements, InstitutionalHolder, KeyMetrics, MajorHolder, MarketSnapshot,
    Ownership, PricePoint, Recommendation, StatementPeriod,
};
pub use yahoo::YahooFinanceGateway;

use crate::error::Result;
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

/// Source of structured market data for a ticker
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MarketDataGateway: Send + Sync {
    /// Fetch a snapshot for `ticker`
    ///
    /// Tickers that are not 1-5 uppercase letters are rejected with
    /// [`InvestError::InvalidTicker`](crate::InvestError::InvalidTicker)
    /// before any request is made.
    async fn fetch(&self, ticker: &str) -> Result<MarketSnapshot>;
}

/// `^[A-Z]{1,5}$`
pub fn validate_ticker(ticker: &str) -> bool {
    (1..=5).contains(&ticker.len()) && ticker.bytes().all(|b| b.is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ticker() {
        assert!(validate_ticker("A"));
        assert!(validate_ticker("TSLA"));
        assert!(validate_ticker("GOOGL"));
        assert!(!validate_ticker(""));
        assert!(!validate_ticker("NVIDIA"));
        assert!(!validate_ticker("tsla"));
        assert!(!validate_ticker("BRK.B"));
        assert!(!validate_ticker("ÄPL"));
    }
}

//! Entity extraction from free-text investment queries
//!
//! A query yields an optional ticker (the first standalone run of 1-5
//! uppercase letters) and an optional company name (the capture of the
//! first matching phrase pattern). The extractor does not try to tell real
//! tickers from other short all-caps words: "USA" or "I" win if they come
//! first.

use crate::error::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};

const TICKER_PATTERN: &str = r"\b([A-Z]{1,5})\b";

/// Phrase patterns in priority order; the first match wins.
/// The phrase may run up to the end of the query or to one final newline.
const COMPANY_PATTERNS: &[&str] = &[
    r"(?i)analysis of (.*?) please",
    r"(?i)research on (.*?)\n?$",
    r"(?i)information about (.*?)\n?$",
    r"(?i)evaluate (.*?)\n?$",
    r"(?i)analyze (.*?)\n?$",
];

/// A parenthesized ticker closing the captured phrase, e.g. "Apple stock (AAPL)"
const TRAILING_TICKER: &str = r"\s*\(\s*[A-Z]{1,5}\s*\)\s*$";

/// Entities found in a query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedEntities {
    pub company_name: Option<String>,
    pub ticker: Option<String>,
}

impl ExtractedEntities {
    /// True when neither a company nor a ticker was found
    pub fn is_empty(&self) -> bool {
        self.company_name.is_none() && self.ticker.is_none()
    }

    /// Company name used downstream: the extracted name, else the ticker
    pub fn display_company(&self) -> Option<&str> {
        self.company_name.as_deref().or(self.ticker.as_deref())
    }
}

/// Parses queries into [`ExtractedEntities`]
#[derive(Debug, Clone)]
pub struct EntityExtractor {
    ticker: Regex,
    companies: Vec<Regex>,
    trailing_ticker: Regex,
}

impl EntityExtractor {
    /// Compile the extraction patterns
    pub fn new() -> Result<Self> {
        Ok(Self {
            ticker: Regex::new(TICKER_PATTERN)?,
            companies: COMPANY_PATTERNS
                .iter()
                .map(|p| Regex::new(p))
                .collect::<std::result::Result<_, _>>()?,
            trailing_ticker: Regex::new(TRAILING_TICKER)?,
        })
    }

    /// Extract the ticker and company name from `query`
    pub fn extract(&self, query: &str) -> ExtractedEntities {
        ExtractedEntities {
            company_name: self.extract_company(query),
            ticker: self.extract_ticker(query),
        }
    }

    /// First standalone 1-5 letter uppercase word
    pub fn extract_ticker(&self, query: &str) -> Option<String> {
        self.ticker
            .captures(query)
            .map(|caps| caps[1].to_string())
    }

    /// Trimmed capture of the first matching phrase pattern
    pub fn extract_company(&self, query: &str) -> Option<String> {
        let captured = self
            .companies
            .iter()
            .find_map(|re| re.captures(query).and_then(|caps| caps.get(1)))?;

        let name = self.trailing_ticker.replace(captured.as_str(), "");
        let name = name.trim();
        (!name.is_empty()).then(|| name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> EntityExtractor {
        EntityExtractor::new().unwrap()
    }

    #[test]
    fn test_ticker_and_company_from_analyze() {
        let entities = extractor().extract("Analyze Tesla's financial position (TSLA)");
        assert_eq!(entities.ticker.as_deref(), Some("TSLA"));
        assert_eq!(
            entities.company_name.as_deref(),
            Some("Tesla's financial position")
        );
    }

    #[test]
    fn test_research_without_ticker() {
        // six letters is too long for a ticker
        let entities = extractor().extract("Research on NVIDIA Corporation");
        assert_eq!(entities.ticker, None);
        assert_eq!(entities.company_name.as_deref(), Some("NVIDIA Corporation"));
    }

    #[test]
    fn test_pattern_priority() {
        let ex = extractor();
        assert_eq!(
            ex.extract_company("Give me an analysis of Microsoft please").as_deref(),
            Some("Microsoft")
        );
        assert_eq!(
            ex.extract_company("information about Apple").as_deref(),
            Some("Apple")
        );
        assert_eq!(
            ex.extract_company("please evaluate Apple stock (AAPL)").as_deref(),
            Some("Apple stock")
        );
        // "research on" is tried before "analyze"
        assert_eq!(
            ex.extract_company("analyze and research on Amazon").as_deref(),
            Some("Amazon")
        );
    }

    #[test]
    fn test_case_insensitive_phrases() {
        assert_eq!(
            extractor().extract_company("EVALUATE Alphabet").as_deref(),
            Some("Alphabet")
        );
    }

    #[test]
    fn test_first_uppercase_word_wins() {
        let ex = extractor();
        assert_eq!(ex.extract_ticker("Is USA exposure risky for AAPL").as_deref(), Some("USA"));
        assert_eq!(ex.extract_ticker("what about MSFT and GOOGL").as_deref(), Some("MSFT"));
        assert_eq!(ex.extract_ticker("no tickers here"), None);
    }

    #[test]
    fn test_ticker_only_falls_back_to_ticker() {
        let entities = extractor().extract("AMD outlook");
        assert_eq!(entities.company_name, None);
        assert_eq!(entities.display_company(), Some("AMD"));
    }

    #[test]
    fn test_single_trailing_newline_is_tolerated() {
        let entities = extractor().extract("Research on NVIDIA Corporation\n");
        assert_eq!(entities.company_name.as_deref(), Some("NVIDIA Corporation"));

        let entities = extractor().extract("Evaluate Microsoft (MSFT)\n");
        assert_eq!(entities.ticker.as_deref(), Some("MSFT"));
        assert_eq!(entities.company_name.as_deref(), Some("Microsoft"));
    }

    #[test]
    fn test_nothing_found() {
        let entities = extractor().extract("xyz");
        assert!(entities.is_empty());
        assert_eq!(entities.display_company(), None);
    }

    #[test]
    fn test_bare_parenthesized_ticker_is_not_a_company() {
        let entities = extractor().extract("Analyze (NVDA)");
        assert_eq!(entities.company_name, None);
        assert_eq!(entities.ticker.as_deref(), Some("NVDA"));
    }

    #[test]
    fn test_deterministic() {
        let ex = extractor();
        let q = "Evaluate Apple stock (AAPL)";
        assert_eq!(ex.extract(q), ex.extract(q));
    }
}

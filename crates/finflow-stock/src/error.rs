//! Error types for FinFlow's financial tools
//!
//! The `Display` text of [`StockError`] is what callers see: tools wrap it as
//! `Error: <text>`, or as `{"error": "<text>"}` for stock data.

use crate::period::Period;
use std::fmt::Display;
use thiserror::Error;

/// Errors produced by the financial tools
#[derive(Debug, Error)]
pub enum StockError {
    /// Blank ticker passed to the stock data tool
    #[error("Invalid ticker provided.")]
    InvalidTicker,

    /// Blank symbol passed to the trend or advisor tools
    #[error("Invalid stock symbol provided.")]
    InvalidSymbol,

    /// Blank news query
    #[error("Invalid query provided.")]
    InvalidQuery,

    /// Blank text passed to sentiment analysis
    #[error("Invalid text provided.")]
    InvalidText,

    /// Period code outside the supported set
    #[error("Invalid time period: {0}. Valid options: {options}", options = Period::valid_options())]
    InvalidPeriod(String),

    /// Date not in YYYY-MM-DD form or not a calendar date
    #[error("Invalid date format. Use YYYY-MM-DD.")]
    InvalidDate,

    /// Provider returned no records for a period
    #[error("No data available for ticker {ticker} with the time period {period}")]
    NoPeriodData { ticker: String, period: String },

    /// Provider returned no records for a date range
    #[error("No data available for ticker {ticker} between {start} and {end}")]
    NoRangeData {
        ticker: String,
        start: String,
        end: String,
    },

    /// News search came back empty
    #[error("No news results found.")]
    NoNewsResults,

    /// Market trend search came back empty
    #[error("No search results found for market trends.")]
    NoTrendResults,

    /// An external call failed
    #[error("Failed to {action} - {cause}")]
    Failed { action: &'static str, cause: String },

    /// Prompt template could not be compiled
    #[error("Prompt template error: {0}")]
    Template(#[from] minijinja::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] finflow_utils::ConfigError),
}

impl StockError {
    /// Wrap an external failure with the action that was being attempted
    pub fn failed(action: &'static str, cause: impl Display) -> Self {
        Self::Failed {
            action,
            cause: cause.to_string(),
        }
    }

    /// Plain-text envelope used by the text tools
    pub fn to_text(&self) -> String {
        format!("Error: {self}")
    }

    /// JSON envelope used by the stock data tool
    pub fn to_json(&self) -> String {
        serde_json::json!({ "error": self.to_string() }).to_string()
    }
}

/// Result type alias for stock operations
pub type Result<T> = std::result::Result<T, StockError>;

/// Errors from the upstream data and search providers
#[derive(Debug, Error)]
pub enum ApiError {
    /// Yahoo Finance API error
    #[error("Yahoo Finance error: {0}")]
    YahooFinance(String),

    /// Web search error
    #[error("Search error: {0}")]
    Search(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StockError::InvalidPeriod("2w".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid time period: 2w. Valid options: 1d, 5d, 1mo, 3mo, 6mo, 1y, 5y, 10y, ytd, max"
        );

        let err = StockError::NoRangeData {
            ticker: "AAPL".to_string(),
            start: "2025-04-01".to_string(),
            end: "2025-04-10".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "No data available for ticker AAPL between 2025-04-01 and 2025-04-10"
        );
    }

    #[test]
    fn test_text_envelope() {
        assert_eq!(StockError::InvalidText.to_text(), "Error: Invalid text provided.");

        let err = StockError::failed("analyze sentiment", "connection refused");
        assert_eq!(
            err.to_text(),
            "Error: Failed to analyze sentiment - connection refused"
        );
    }

    #[test]
    fn test_json_envelope() {
        let value: serde_json::Value =
            serde_json::from_str(&StockError::InvalidDate.to_json()).unwrap();
        assert_eq!(value["error"], "Invalid date format. Use YYYY-MM-DD.");
    }

    #[test]
    fn test_api_error_display() {
        let err = ApiError::YahooFinance("fetching the data failed".to_string());
        assert_eq!(err.to_string(), "Yahoo Finance error: fetching the data failed");
    }
}

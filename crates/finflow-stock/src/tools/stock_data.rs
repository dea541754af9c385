//! Historical price retrieval tool (`get_stock_data`)

use crate::api::{PriceProvider, PriceRecord};
use crate::cache::{CacheKey, MemoCache};
use crate::error::{Result, StockError};
use crate::period::Period;
use async_trait::async_trait;
use chrono::NaiveDate;
use finflow_tools::{Tool, parse_arguments};
use regex::Regex;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::{Arc, LazyLock};
use tracing::{info, warn};

static DATE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern is valid"));

const DEFAULT_PERIOD: &str = "1y";

#[derive(Debug, Deserialize)]
struct StockDataParams {
    stock_symbol: String,
    #[serde(default = "default_period")]
    time_period: String,
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    end_date: Option<String>,
}

fn default_period() -> String {
    DEFAULT_PERIOD.to_string()
}

/// Fetches daily price history for a ticker, by lookback period or date range
pub struct StockDataTool {
    prices: Arc<dyn PriceProvider>,
    cache: MemoCache<Vec<PriceRecord>>,
}

impl StockDataTool {
    pub fn new(prices: Arc<dyn PriceProvider>, cache_capacity: usize) -> Self {
        Self {
            prices,
            cache: MemoCache::new(cache_capacity),
        }
    }

    /// Daily bars for a lookback period such as `1mo` or `ytd`
    pub async fn by_period(&self, ticker: &str, time_period: &str) -> Result<Vec<PriceRecord>> {
        let ticker = validate_ticker(ticker)?;
        let period: Period = time_period.parse()?;
        let symbol = ticker.to_uppercase();

        let key = CacheKey::new("stock_data.period", (&symbol, period.as_str()));
        self.cache
            .get_or_fetch(key, || async {
                info!(symbol = %symbol, period = %period, "Fetching price history");
                let records = self
                    .prices
                    .history_for_period(&symbol, period)
                    .await
                    .map_err(|e| super::external_failure("fetch data", ticker, e))?;

                if records.is_empty() {
                    warn!(symbol = %symbol, period = %period, "No price history returned");
                    return Err(StockError::NoPeriodData {
                        ticker: ticker.to_string(),
                        period: period.to_string(),
                    });
                }
                Ok(records)
            })
            .await
    }

    /// Daily bars from `start_date` (inclusive) to `end_date` (exclusive)
    pub async fn by_dates(
        &self,
        ticker: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<PriceRecord>> {
        let ticker = validate_ticker(ticker)?;
        let start = parse_date(start_date)?;
        let end = parse_date(end_date)?;
        let symbol = ticker.to_uppercase();

        let no_data = || StockError::NoRangeData {
            ticker: ticker.to_string(),
            start: start_date.to_string(),
            end: end_date.to_string(),
        };

        // An empty or inverted range can never hold a bar
        if start >= end {
            return Err(no_data());
        }

        let key = CacheKey::new("stock_data.dates", (&symbol, start_date, end_date));
        self.cache
            .get_or_fetch(key, || async {
                info!(symbol = %symbol, %start, %end, "Fetching price history");
                let records = self
                    .prices
                    .history_between(&symbol, start, end)
                    .await
                    .map_err(|e| super::external_failure("fetch data", ticker, e))?;

                if records.is_empty() {
                    warn!(symbol = %symbol, %start, %end, "No price history returned");
                    return Err(no_data());
                }
                Ok(records)
            })
            .await
    }

    /// Pick the date range when both bounds are given, else the period
    pub async fn fetch(
        &self,
        ticker: &str,
        time_period: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Vec<PriceRecord>> {
        match (non_empty(start_date), non_empty(end_date)) {
            (Some(start), Some(end)) => self.by_dates(ticker, start, end).await,
            _ => self.by_period(ticker, time_period).await,
        }
    }

    /// Tool output: a JSON array of bars, or `{"error": ...}`
    pub async fn render(
        &self,
        ticker: &str,
        time_period: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> String {
        records_to_json(self.fetch(ticker, time_period, start_date, end_date).await)
    }
}

/// Serialize a price history result the way the tool reports it
pub fn records_to_json(result: Result<Vec<PriceRecord>>) -> String {
    result
        .and_then(|records| {
            serde_json::to_string(&records).map_err(|e| StockError::failed("fetch data", e))
        })
        .unwrap_or_else(|e| e.to_json())
}

fn validate_ticker(ticker: &str) -> Result<&str> {
    let ticker = ticker.trim();
    if ticker.is_empty() {
        return Err(StockError::InvalidTicker);
    }
    Ok(ticker)
}

fn parse_date(date: &str) -> Result<NaiveDate> {
    if !DATE_SHAPE.is_match(date) {
        return Err(StockError::InvalidDate);
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| StockError::InvalidDate)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[async_trait]
impl Tool for StockDataTool {
    async fn call(&self, arguments: Value) -> finflow_tools::Result<String> {
        let params: StockDataParams = parse_arguments(self.name(), arguments)?;
        Ok(self
            .render(
                &params.stock_symbol,
                &params.time_period,
                params.start_date.as_deref(),
                params.end_date.as_deref(),
            )
            .await)
    }

    fn name(&self) -> &str {
        "get_stock_data"
    }

    fn description(&self) -> &str {
        "Fetch historical daily stock prices for a ticker. Use time_period \
         (1d, 5d, 1mo, 3mo, 6mo, 1y, 5y, 10y, ytd, max) or both start_date and \
         end_date in YYYY-MM-DD form. Returns a JSON array of daily records."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "stock_symbol": {
                    "type": "string",
                    "description": "Ticker symbol, e.g. AAPL"
                },
                "time_period": {
                    "type": "string",
                    "description": "Lookback period",
                    "enum": Period::ALL.iter().map(|p| p.as_str()).collect::<Vec<_>>(),
                    "default": DEFAULT_PERIOD
                },
                "start_date": {
                    "type": "string",
                    "description": "Range start (YYYY-MM-DD), inclusive"
                },
                "end_date": {
                    "type": "string",
                    "description": "Range end (YYYY-MM-DD), exclusive"
                }
            },
            "required": ["stock_symbol"]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::yahoo::MockPriceProvider;
    use crate::error::ApiError;

    fn bar(date: &str) -> PriceRecord {
        PriceRecord {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            open: 170.0,
            high: 172.5,
            low: 169.1,
            close: 171.2,
            adj_close: 171.2,
            volume: 51_000_000,
        }
    }

    fn tool(prices: MockPriceProvider) -> StockDataTool {
        StockDataTool::new(Arc::new(prices), 50)
    }

    fn error_of(output: &str) -> String {
        let value: Value = serde_json::from_str(output).unwrap();
        value["error"].as_str().unwrap_or_default().to_string()
    }

    #[tokio::test]
    async fn test_valid_period_returns_records() {
        let mut prices = MockPriceProvider::new();
        prices
            .expect_history_for_period()
            .withf(|symbol, period| symbol.eq("AAPL") && matches!(period, Period::OneYear))
            .times(1)
            .returning(|_, _| Ok(vec![bar("2025-04-01"), bar("2025-04-02")]));

        let output = tool(prices).render("AAPL", "1y", None, None).await;
        let value: Value = serde_json::from_str(&output).unwrap();

        let records = value.as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["Date"], "2025-04-01");
        assert_eq!(records[0]["Adj Close"], 171.2);
        assert_eq!(records[0]["Volume"], 51_000_000);
    }

    #[tokio::test]
    async fn test_ticker_is_normalized() {
        let mut prices = MockPriceProvider::new();
        prices
            .expect_history_for_period()
            .withf(|symbol, _| symbol.eq("MSFT"))
            .times(1)
            .returning(|_, _| Ok(vec![bar("2025-04-01")]));

        let records = tool(prices).by_period("  msft ", "5d").await.unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_ticker_reports_no_data() {
        let mut prices = MockPriceProvider::new();
        prices
            .expect_history_for_period()
            .returning(|_, _| Ok(Vec::new()));

        let output = tool(prices).render("INVALIDTICKER", "1y", None, None).await;
        assert_eq!(
            error_of(&output),
            "No data available for ticker INVALIDTICKER with the time period 1y"
        );
    }

    #[tokio::test]
    async fn test_invalid_period_skips_provider() {
        let output = tool(MockPriceProvider::new())
            .render("AAPL", "2w", None, None)
            .await;
        assert!(error_of(&output).starts_with("Invalid time period: 2w. Valid options:"));
    }

    #[tokio::test]
    async fn test_blank_ticker() {
        let output = tool(MockPriceProvider::new())
            .render("   ", "1y", None, None)
            .await;
        assert_eq!(error_of(&output), "Invalid ticker provided.");
    }

    #[tokio::test]
    async fn test_malformed_dates() {
        let tool = tool(MockPriceProvider::new());

        for (start, end) in [
            ("2025-13-01", "2025-04-10"),
            ("2025-02-30", "2025-04-10"),
            ("2025-4-1", "2025-04-10"),
            ("2025-04-01", "April 10"),
        ] {
            let output = tool.render("AAPL", "1y", Some(start), Some(end)).await;
            assert!(
                error_of(&output).contains("Invalid date format"),
                "{start}..{end}: {output}"
            );
        }
    }

    #[tokio::test]
    async fn test_inverted_range_skips_provider() {
        let err = tool(MockPriceProvider::new())
            .by_dates("AAPL", "2025-04-10", "2025-04-01")
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "No data available for ticker AAPL between 2025-04-10 and 2025-04-01"
        );
    }

    #[tokio::test]
    async fn test_date_range_takes_precedence() {
        let mut prices = MockPriceProvider::new();
        prices
            .expect_history_between()
            .withf(|symbol, start, end| {
                symbol.eq("AAPL")
                    && start.to_string() == "2025-04-01"
                    && end.to_string() == "2025-04-10"
            })
            .times(1)
            .returning(|_, _, _| Ok(vec![bar("2025-04-01")]));

        let output = tool(prices)
            .call(json!({
                "stock_symbol": "AAPL",
                "time_period": "5y",
                "start_date": "2025-04-01",
                "end_date": "2025-04-10"
            }))
            .await
            .unwrap();
        assert!(output.starts_with('['));
    }

    #[tokio::test]
    async fn test_single_date_falls_back_to_default_period() {
        let mut prices = MockPriceProvider::new();
        prices
            .expect_history_for_period()
            .withf(|_, period| matches!(period, Period::OneYear))
            .times(1)
            .returning(|_, _| Ok(vec![bar("2025-04-01")]));

        let output = tool(prices)
            .call(json!({ "stock_symbol": "AAPL", "start_date": "2025-04-01" }))
            .await
            .unwrap();
        assert!(output.starts_with('['));
    }

    #[tokio::test]
    async fn test_repeated_calls_are_memoized() {
        let mut prices = MockPriceProvider::new();
        prices
            .expect_history_for_period()
            .times(1)
            .returning(|_, _| Ok(vec![bar("2025-04-01")]));

        let tool = tool(prices);
        let first = tool.render("AAPL", "1mo", None, None).await;
        let second = tool.render("AAPL", "1mo", None, None).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_provider_failure_is_not_cached() {
        let mut prices = MockPriceProvider::new();
        prices
            .expect_history_for_period()
            .times(2)
            .returning(|_, _| Err(ApiError::YahooFinance("fetching the data failed".to_string())));

        let tool = tool(prices);
        for _ in 0..2 {
            let output = tool.render("AAPL", "1y", None, None).await;
            assert_eq!(
                error_of(&output),
                "Failed to fetch data - Yahoo Finance error: fetching the data failed"
            );
        }
    }

    #[tokio::test]
    async fn test_missing_symbol_is_argument_error() {
        let result = tool(MockPriceProvider::new())
            .call(json!({ "time_period": "1y" }))
            .await;
        assert!(matches!(
            result,
            Err(finflow_tools::ToolError::InvalidArguments { .. })
        ));
    }
}

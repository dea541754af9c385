//! Yahoo Finance API client

use crate::error::ApiError;
use crate::period::Period;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::debug;
use yahoo_finance_api as yahoo;

type ApiResult<T> = std::result::Result<T, ApiError>;

/// One daily price bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Open")]
    pub open: f64,
    #[serde(rename = "High")]
    pub high: f64,
    #[serde(rename = "Low")]
    pub low: f64,
    #[serde(rename = "Close")]
    pub close: f64,
    #[serde(rename = "Adj Close")]
    pub adj_close: f64,
    #[serde(rename = "Volume")]
    pub volume: u64,
}

/// Source of historical daily prices
///
/// An unknown symbol yields an empty list rather than an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Daily bars covering the given lookback period
    async fn history_for_period(&self, symbol: &str, period: Period) -> ApiResult<Vec<PriceRecord>>;

    /// Daily bars from `start` (inclusive) to `end` (exclusive)
    async fn history_between(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ApiResult<Vec<PriceRecord>>;
}

/// Yahoo Finance API client
#[derive(Debug, Default, Clone)]
pub struct YahooFinanceClient {}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client
    pub fn new() -> Self {
        Self {}
    }

    fn connector() -> ApiResult<yahoo::YahooConnector> {
        yahoo::YahooConnector::new().map_err(|e| ApiError::YahooFinance(e.to_string()))
    }
}

#[async_trait]
impl PriceProvider for YahooFinanceClient {
    async fn history_for_period(&self, symbol: &str, period: Period) -> ApiResult<Vec<PriceRecord>> {
        debug!(symbol, period = %period, "Fetching price history");

        let response = match Self::connector()?
            .get_quote_range(symbol, "1d", period.as_str())
            .await
        {
            Ok(response) => response,
            Err(e) => return no_data_or_error(e),
        };

        match response.quotes() {
            Ok(quotes) => Ok(to_records(&quotes)),
            Err(e) => no_data_or_error(e),
        }
    }

    async fn history_between(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ApiResult<Vec<PriceRecord>> {
        debug!(symbol, %start, %end, "Fetching price history");

        let start_odt = midnight_utc(start)?;
        let end_odt = midnight_utc(end)?;

        let response = match Self::connector()?
            .get_quote_history(symbol, start_odt, end_odt)
            .await
        {
            Ok(response) => response,
            Err(e) => return no_data_or_error(e),
        };

        match response.quotes() {
            Ok(quotes) => Ok(to_records(&quotes)),
            Err(e) => no_data_or_error(e),
        }
    }
}

fn midnight_utc(date: NaiveDate) -> ApiResult<OffsetDateTime> {
    let timestamp = date.and_time(NaiveTime::MIN).and_utc().timestamp();
    OffsetDateTime::from_unix_timestamp(timestamp)
        .map_err(|e| ApiError::YahooFinance(format!("Invalid timestamp for {date}: {e}")))
}

fn to_records(quotes: &[yahoo::Quote]) -> Vec<PriceRecord> {
    quotes
        .iter()
        .filter_map(|q| {
            let date = DateTime::from_timestamp(q.timestamp as i64, 0)?.date_naive();
            Some(PriceRecord {
                date,
                open: q.open,
                high: q.high,
                low: q.low,
                close: q.close,
                adj_close: q.adjclose,
                volume: q.volume,
            })
        })
        .collect()
}

/// Yahoo reports an unknown or delisted symbol as an error; callers treat it
/// the same as an empty result.
fn no_data_or_error(err: yahoo::YahooError) -> ApiResult<Vec<PriceRecord>> {
    match err {
        yahoo::YahooError::NoQuotes
        | yahoo::YahooError::NoResult
        | yahoo::YahooError::EmptyDataSet => {
            debug!(error = %err, "Yahoo returned no data");
            Ok(Vec::new())
        }
        // HTTP status text, e.g. "404 Not Found"
        yahoo::YahooError::FetchFailed(ref status) if status.starts_with("404") => {
            debug!(%status, "Yahoo does not know the symbol");
            Ok(Vec::new())
        }
        other => Err(ApiError::YahooFinance(other.to_string())),
    }
}

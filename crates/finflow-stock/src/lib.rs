//! Financial tools for FinFlow
//!
//! This crate implements the five tools FinFlow exposes to agents:
//!
//! - `get_stock_data`: historical daily prices from Yahoo Finance, as JSON
//! - `get_news`: web search for recent news, summarized by a local model
//! - `analyze_sentiment`: Positive/Negative/Neutral classification with a reason
//! - `track_market_trends`: web search for trend coverage, summarized by a local model
//! - `financial_advisor`: chains stock data, news and sentiment into advice
//!
//! Each tool validates its input before any network call, memoizes successful
//! results in a fixed-capacity cache, and reports failures inside its text
//! output (`Error: ...`, or `{"error": ...}` for stock data).
//!
//! # Example
//!
//! ```rust,ignore
//! use finflow_stock::{StockConfig, StockToolkit};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = StockConfig::from_env()?;
//!     let toolkit = StockToolkit::from_config(&config)?;
//!
//!     let advice = toolkit.financial_advisor.render("AAPL").await;
//!     println!("{advice}");
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod llm;
pub mod period;
pub mod prompts;
pub mod tools;

pub use config::StockConfig;
pub use error::{ApiError, Result, StockError};
pub use period::Period;
pub use tools::{
    FinancialAdvisorTool, MarketTrendTool, NewsTool, SentimentTool, StockDataTool, StockToolkit,
};

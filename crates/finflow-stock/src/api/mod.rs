//! Clients for the upstream data providers

pub mod duckduckgo;
pub mod yahoo;

pub use duckduckgo::{DuckDuckGoClient, SearchProvider};
pub use yahoo::{PriceProvider, PriceRecord, YahooFinanceClient};

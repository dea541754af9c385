//! Market trend tool (`track_market_trends`)

use super::external_failure;
use crate::api::SearchProvider;
use crate::cache::{CacheKey, MemoCache};
use crate::error::{Result, StockError};
use crate::llm::ModelClient;
use crate::prompts::Prompts;
use async_trait::async_trait;
use finflow_tools::{Tool, parse_arguments};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{info, warn};

const ACTION: &str = "retrieve market trends";

#[derive(Debug, Deserialize)]
struct MarketTrendParams {
    stock_symbol: String,
}

/// Searches for trend coverage of a stock and has the model analyze it
pub struct MarketTrendTool {
    search: Arc<dyn SearchProvider>,
    model: Arc<ModelClient>,
    prompts: Arc<Prompts>,
    cache: MemoCache<String>,
}

impl MarketTrendTool {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        model: Arc<ModelClient>,
        prompts: Arc<Prompts>,
        cache_capacity: usize,
    ) -> Self {
        Self {
            search,
            model,
            prompts,
            cache: MemoCache::new(cache_capacity),
        }
    }

    pub async fn analyze(&self, symbol: &str) -> Result<String> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(StockError::InvalidSymbol);
        }

        let key = CacheKey::new("market_trend", symbol);
        self.cache
            .get_or_fetch(key, || async {
                let search_query = format!("Market trend for {symbol}");
                info!(symbol, "Searching market trends");

                let results = self
                    .search
                    .search(&search_query)
                    .await
                    .map_err(|e| external_failure(ACTION, symbol, e))?;
                if results.trim().is_empty() {
                    warn!(symbol, "Market trend search returned nothing");
                    return Err(StockError::NoTrendResults);
                }

                let prompt = self
                    .prompts
                    .market_trend(&search_query, &results)
                    .map_err(|e| external_failure(ACTION, symbol, e))?;
                self.model
                    .ask(prompt)
                    .await
                    .map_err(|e| external_failure(ACTION, symbol, e))
            })
            .await
    }

    pub async fn render(&self, symbol: &str) -> String {
        self.analyze(symbol).await.unwrap_or_else(|e| e.to_text())
    }
}

#[async_trait]
impl Tool for MarketTrendTool {
    async fn call(&self, arguments: Value) -> finflow_tools::Result<String> {
        let params: MarketTrendParams = parse_arguments(self.name(), arguments)?;
        Ok(self.render(&params.stock_symbol).await)
    }

    fn name(&self) -> &str {
        "track_market_trends"
    }

    fn description(&self) -> &str {
        "Search for current market trend coverage of a stock and summarize the direction, drivers and outlook."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "stock_symbol": {
                    "type": "string",
                    "description": "Ticker symbol, e.g. NVDA"
                }
            },
            "required": ["stock_symbol"]
        })
    }
}

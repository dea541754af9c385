//! Composite advice tool (`financial_advisor`)
//!
//! Gathers a month of prices, a news summary and the sentiment of that
//! summary, then asks the model for advice. The first failing step ends the
//! chain and its error is what the caller sees.

use super::external_failure;
use super::{NewsTool, SentimentTool, StockDataTool};
use crate::cache::{CacheKey, MemoCache};
use crate::error::{Result, StockError};
use crate::llm::ModelClient;
use crate::period::Period;
use crate::prompts::Prompts;
use async_trait::async_trait;
use finflow_tools::{Tool, parse_arguments};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::info;

const ACTION: &str = "generate financial advice";

#[derive(Debug, Deserialize)]
struct AdvisorParams {
    stock_symbol: String,
}

pub struct FinancialAdvisorTool {
    stock_data: Arc<StockDataTool>,
    news: Arc<NewsTool>,
    sentiment: Arc<SentimentTool>,
    model: Arc<ModelClient>,
    prompts: Arc<Prompts>,
    cache: MemoCache<String>,
}

impl FinancialAdvisorTool {
    pub fn new(
        stock_data: Arc<StockDataTool>,
        news: Arc<NewsTool>,
        sentiment: Arc<SentimentTool>,
        model: Arc<ModelClient>,
        prompts: Arc<Prompts>,
        cache_capacity: usize,
    ) -> Self {
        Self {
            stock_data,
            news,
            sentiment,
            model,
            prompts,
            cache: MemoCache::new(cache_capacity),
        }
    }

    /// Advice for `symbol` built from prices, news and sentiment
    pub async fn analyze(&self, symbol: &str) -> Result<String> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(StockError::InvalidSymbol);
        }

        let key = CacheKey::new("financial_advisor", symbol);
        self.cache
            .get_or_fetch(key, || async {
                info!(symbol, "Preparing financial advice");

                let records = self
                    .stock_data
                    .by_period(symbol, Period::OneMonth.as_str())
                    .await?;
                let stock_data =
                    serde_json::to_string(&records).map_err(|e| external_failure(ACTION, symbol, e))?;

                let news = self.news.analyze(symbol).await?;
                let sentiment = self.sentiment.analyze(&news).await?;

                let prompt = self
                    .prompts
                    .advisor(symbol, &stock_data, &news, &sentiment)
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
impl Tool for FinancialAdvisorTool {
    async fn call(&self, arguments: Value) -> finflow_tools::Result<String> {
        let params: AdvisorParams = parse_arguments(self.name(), arguments)?;
        Ok(self.render(&params.stock_symbol).await)
    }

    fn name(&self) -> &str {
        "financial_advisor"
    }

    fn description(&self) -> &str {
        "Give concise financial advice for a stock based on its last month of prices, recent news and news sentiment."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "stock_symbol": {
                    "type": "string",
                    "description": "Ticker symbol, e.g. AAPL"
                }
            },
            "required": ["stock_symbol"]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::duckduckgo::MockSearchProvider;
    use crate::api::yahoo::MockPriceProvider;
    use crate::api::{PriceRecord, SearchProvider};
    use crate::config::StockConfig;
    use crate::error::ApiError;
    use crate::tools::StockToolkit;
    use crate::tools::testing::FakeModel;
    use chrono::NaiveDate;

    fn bar() -> PriceRecord {
        PriceRecord {
            date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            open: 100.0,
            high: 101.0,
            low: 99.0,
            close: 100.5,
            adj_close: 100.5,
            volume: 1_000,
        }
    }

    /// Replies by recognizing which prompt it was given
    fn scripted_model(advice: Option<&'static str>) -> Arc<FakeModel> {
        FakeModel::with(move |prompt| {
            if prompt.contains("news analyst") {
                Some("Apple launched a new chip.".to_string())
            } else if prompt.contains("sentiment analyst") {
                Some("Sentiment: Positive\nReason: Product launch.".to_string())
            } else {
                advice.map(str::to_string)
            }
        })
    }

    fn prices_returning(records: Vec<PriceRecord>) -> MockPriceProvider {
        let mut prices = MockPriceProvider::new();
        prices
            .expect_history_for_period()
            .withf(|_, period| matches!(period, Period::OneMonth))
            .returning(move |_, _| Ok(records.clone()));
        prices
    }

    fn search_returning(text: &'static str) -> MockSearchProvider {
        let mut search = MockSearchProvider::new();
        search.expect_search().returning(move |_| Ok(text.to_string()));
        search
    }

    fn toolkit(
        model: Arc<FakeModel>,
        search: impl SearchProvider + 'static,
        prices: MockPriceProvider,
    ) -> StockToolkit {
        StockToolkit::new(
            &StockConfig::default(),
            model,
            Arc::new(search),
            Arc::new(prices),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_combines_all_sources() {
        let model = scripted_model(Some("Hold and watch earnings."));
        let toolkit = toolkit(
            model.clone(),
            search_returning("Apple unveils chip."),
            prices_returning(vec![bar()]),
        );

        let output = toolkit.financial_advisor.render("AAPL").await;
        assert_eq!(output, "Hold and watch earnings.");

        let prompts = model.prompts();
        assert_eq!(prompts.len(), 3);
        let advisor_prompt = &prompts[2];
        assert!(advisor_prompt.contains("stock symbol AAPL"));
        assert!(advisor_prompt.contains("\"Adj Close\":100.5"));
        assert!(advisor_prompt.contains("Apple launched a new chip."));
        assert!(advisor_prompt.contains("Sentiment: Positive"));
    }

    #[tokio::test]
    async fn test_blank_symbol() {
        let model = scripted_model(Some("unused"));
        let toolkit = toolkit(model.clone(), MockSearchProvider::new(), MockPriceProvider::new());

        assert_eq!(
            toolkit.financial_advisor.render(" ").await,
            "Error: Invalid stock symbol provided."
        );
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_stock_data_failure_short_circuits() {
        let model = scripted_model(Some("unused"));
        let toolkit = toolkit(
            model.clone(),
            MockSearchProvider::new(),
            prices_returning(Vec::new()),
        );

        let output = toolkit.financial_advisor.render("NOPE").await;
        assert_eq!(
            output,
            "Error: No data available for ticker NOPE with the time period 1mo"
        );
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_news_failure_is_passed_through() {
        let model = scripted_model(Some("unused"));
        let mut search = MockSearchProvider::new();
        search
            .expect_search()
            .returning(|_| Err(ApiError::Search("HTTP 503".to_string())));
        let toolkit = toolkit(model.clone(), search, prices_returning(vec![bar()]));

        let output = toolkit.financial_advisor.render("AAPL").await;
        assert_eq!(output, toolkit.news.render("AAPL").await);
        assert!(output.starts_with("Error: Failed to retrieve news analysis"));
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_advice_failure() {
        let model = scripted_model(None);
        let toolkit = toolkit(
            model,
            search_returning("Apple unveils chip."),
            prices_returning(vec![bar()]),
        );

        let output = toolkit.financial_advisor.render("AAPL").await;
        assert!(output.starts_with("Error: Failed to generate financial advice - "));
    }

    #[tokio::test]
    async fn test_sub_calls_share_tool_caches() {
        let model = scripted_model(Some("Buy."));
        let mut prices = MockPriceProvider::new();
        prices
            .expect_history_for_period()
            .times(1)
            .returning(|_, _| Ok(vec![bar()]));
        let mut search = MockSearchProvider::new();
        search
            .expect_search()
            .times(1)
            .returning(|_| Ok("Apple unveils chip.".to_string()));
        let toolkit = toolkit(model.clone(), search, prices);

        // Warm the shared caches through the direct tools
        toolkit.stock_data.by_period("AAPL", "1mo").await.unwrap();
        toolkit.news.analyze("AAPL").await.unwrap();

        assert_eq!(toolkit.financial_advisor.render("AAPL").await, "Buy.");
        assert_eq!(toolkit.financial_advisor.render("AAPL").await, "Buy.");
        // news + sentiment + advice, each once
        assert_eq!(model.calls(), 3);
    }
}

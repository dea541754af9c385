//! News search and summarization tool (`get_news`)

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

const ACTION: &str = "retrieve news analysis";

#[derive(Debug, Deserialize)]
struct NewsParams {
    stock_symbol: String,
}

/// Searches the web for recent news and has the model summarize it
pub struct NewsTool {
    search: Arc<dyn SearchProvider>,
    model: Arc<ModelClient>,
    prompts: Arc<Prompts>,
    cache: MemoCache<String>,
}

impl NewsTool {
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

    /// Summarize the latest news about `query`
    pub async fn analyze(&self, query: &str) -> Result<String> {
        let query = query.trim();
        if query.is_empty() {
            return Err(StockError::InvalidQuery);
        }

        let key = CacheKey::new("news", query);
        self.cache
            .get_or_fetch(key, || async {
                let search_query = format!("What are the latest news on {query}");
                info!(query, "Searching news");

                let results = self
                    .search
                    .search(&search_query)
                    .await
                    .map_err(|e| external_failure(ACTION, query, e))?;
                if results.trim().is_empty() {
                    warn!(query, "News search returned nothing");
                    return Err(StockError::NoNewsResults);
                }

                let prompt = self
                    .prompts
                    .news(&search_query, &results)
                    .map_err(|e| external_failure(ACTION, query, e))?;
                self.model
                    .ask(prompt)
                    .await
                    .map_err(|e| external_failure(ACTION, query, e))
            })
            .await
    }

    /// Tool output: the summary, or `Error: ...`
    pub async fn render(&self, query: &str) -> String {
        self.analyze(query).await.unwrap_or_else(|e| e.to_text())
    }
}

#[async_trait]
impl Tool for NewsTool {
    async fn call(&self, arguments: Value) -> finflow_tools::Result<String> {
        let params: NewsParams = parse_arguments(self.name(), arguments)?;
        Ok(self.render(&params.stock_symbol).await)
    }

    fn name(&self) -> &str {
        "get_news"
    }

    fn description(&self) -> &str {
        "Search the web for the latest news about a stock and summarize the key points."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "stock_symbol": {
                    "type": "string",
                    "description": "Ticker symbol or company name to search news for"
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
    use crate::config::StockConfig;
    use crate::error::ApiError;
    use crate::tools::testing::FakeModel;
    use finflow_llm::LLMProvider;

    fn tool(search: MockSearchProvider, model: Arc<dyn LLMProvider>) -> NewsTool {
        NewsTool::new(
            Arc::new(search),
            Arc::new(ModelClient::new(model, &StockConfig::default())),
            Arc::new(Prompts::new().unwrap()),
            50,
        )
    }

    #[tokio::test]
    async fn test_summarizes_search_results() {
        let mut search = MockSearchProvider::new();
        search
            .expect_search()
            .withf(|query| query == "What are the latest news on AAPL")
            .times(1)
            .returning(|_| Ok("Apple unveils new chip. Shares rise 3%.".to_string()));
        let model = FakeModel::replying("Apple shares rose after a chip launch.");

        let output = tool(search, model.clone()).render("AAPL").await;

        assert_eq!(output, "Apple shares rose after a chip launch.");
        let prompt = &model.prompts()[0];
        assert!(prompt.contains("Apple unveils new chip"));
        assert!(prompt.contains("What are the latest news on AAPL"));
    }

    #[tokio::test]
    async fn test_blank_query() {
        let model = FakeModel::replying("unused");
        let output = tool(MockSearchProvider::new(), model.clone()).render("  ").await;

        assert_eq!(output, "Error: Invalid query provided.");
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_search_results() {
        let mut search = MockSearchProvider::new();
        search.expect_search().returning(|_| Ok("  ".to_string()));
        let model = FakeModel::replying("unused");

        let output = tool(search, model.clone()).render("AAPL").await;

        assert_eq!(output, "Error: No news results found.");
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_search_failure() {
        let mut search = MockSearchProvider::new();
        search
            .expect_search()
            .returning(|_| Err(ApiError::Search("HTTP 503".to_string())));

        let output = tool(search, FakeModel::replying("unused")).render("AAPL").await;

        assert_eq!(
            output,
            "Error: Failed to retrieve news analysis - Search error: HTTP 503"
        );
    }

    #[tokio::test]
    async fn test_model_failure() {
        let mut search = MockSearchProvider::new();
        search.expect_search().returning(|_| Ok("results".to_string()));

        let output = tool(search, FakeModel::failing()).render("AAPL").await;

        assert!(output.starts_with("Error: Failed to retrieve news analysis - "));
    }

    #[tokio::test]
    async fn test_repeated_calls_are_memoized() {
        let mut search = MockSearchProvider::new();
        search
            .expect_search()
            .times(1)
            .returning(|_| Ok("results".to_string()));
        let model = FakeModel::replying("summary");
        let tool = tool(search, model.clone());

        assert_eq!(tool.render("TSLA").await, "summary");
        assert_eq!(tool.render("TSLA").await, "summary");
        assert_eq!(model.calls(), 1);
    }
}

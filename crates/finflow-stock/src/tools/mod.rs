//! The five FinFlow tools and the toolkit that wires them together

mod financial_advisor;
mod market_trend;
mod news;
mod sentiment;
mod stock_data;

pub use financial_advisor::FinancialAdvisorTool;
pub use market_trend::MarketTrendTool;
pub use news::NewsTool;
pub use sentiment::SentimentTool;
pub use stock_data::{StockDataTool, records_to_json};

use crate::api::{DuckDuckGoClient, PriceProvider, SearchProvider, YahooFinanceClient};
use crate::config::StockConfig;
use crate::error::{Result, StockError};
use crate::llm::ModelClient;
use crate::prompts::Prompts;
use finflow_llm::LLMProvider;
use finflow_llm::providers::{OllamaConfig, OllamaProvider};
use finflow_tools::ToolRegistry;
use std::fmt::Display;
use std::sync::Arc;
use tracing::error;

/// All five tools, sharing one model client and one set of prompts
///
/// The advisor calls into the same stock data, news and sentiment instances
/// that are registered for direct use, so their caches are shared.
pub struct StockToolkit {
    pub stock_data: Arc<StockDataTool>,
    pub news: Arc<NewsTool>,
    pub sentiment: Arc<SentimentTool>,
    pub market_trend: Arc<MarketTrendTool>,
    pub financial_advisor: Arc<FinancialAdvisorTool>,
}

impl StockToolkit {
    /// Build the toolkit over explicit providers
    pub fn new(
        config: &StockConfig,
        llm: Arc<dyn LLMProvider>,
        search: Arc<dyn SearchProvider>,
        prices: Arc<dyn PriceProvider>,
    ) -> Result<Self> {
        let model = Arc::new(ModelClient::new(llm, config));
        let prompts = Arc::new(Prompts::new()?);
        let capacity = config.cache_capacity;

        let stock_data = Arc::new(StockDataTool::new(prices, capacity));
        let news = Arc::new(NewsTool::new(
            Arc::clone(&search),
            Arc::clone(&model),
            Arc::clone(&prompts),
            capacity,
        ));
        let sentiment = Arc::new(SentimentTool::new(
            Arc::clone(&model),
            Arc::clone(&prompts),
            capacity,
        ));
        let market_trend = Arc::new(MarketTrendTool::new(
            search,
            Arc::clone(&model),
            Arc::clone(&prompts),
            capacity,
        ));
        let financial_advisor = Arc::new(FinancialAdvisorTool::new(
            Arc::clone(&stock_data),
            Arc::clone(&news),
            Arc::clone(&sentiment),
            model,
            prompts,
            capacity,
        ));

        Ok(Self {
            stock_data,
            news,
            sentiment,
            market_trend,
            financial_advisor,
        })
    }

    /// Build the toolkit against Ollama, DuckDuckGo and Yahoo Finance
    pub fn from_config(config: &StockConfig) -> Result<Self> {
        let llm = OllamaProvider::with_config(
            OllamaConfig::new(&config.ollama_base_url)
                .with_timeout(config.request_timeout.as_secs()),
        )
        .map_err(|e| StockError::failed("initialize language model client", e))?;

        let search = DuckDuckGoClient::from_config(config)
            .map_err(|e| StockError::failed("initialize web search client", e))?;

        Self::new(
            config,
            Arc::new(llm),
            Arc::new(search),
            Arc::new(YahooFinanceClient::new()),
        )
    }

    /// Register every tool with the given registry
    pub fn register(&self, registry: &ToolRegistry) {
        registry.register(self.news.clone());
        registry.register(self.stock_data.clone());
        registry.register(self.sentiment.clone());
        registry.register(self.market_trend.clone());
        registry.register(self.financial_advisor.clone());
    }

    /// A fresh registry holding every tool
    pub fn registry(&self) -> ToolRegistry {
        let registry = ToolRegistry::new();
        self.register(&registry);
        registry
    }
}

/// Log an external failure and wrap it for the caller
fn external_failure(action: &'static str, subject: &str, cause: impl Display) -> StockError {
    error!(subject, error = %cause, "Failed to {action}");
    StockError::failed(action, cause)
}

//! DuckDuckGo web search client
//!
//! Queries the HTML results page and returns the result snippets joined into
//! one block of text, ready to be pasted into a prompt.

use crate::config::StockConfig;
use crate::error::ApiError;
use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use scraper::{Html, Selector};
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::debug;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

const USER_AGENT: &str = concat!("Mozilla/5.0 (compatible; finflow/", env!("CARGO_PKG_VERSION"), ")");

/// Text search over the web
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Run a query and return the result text; empty when nothing matched
    async fn search(&self, query: &str) -> Result<String, ApiError>;
}

/// DuckDuckGo client with rate limiting
pub struct DuckDuckGoClient {
    client: Client,
    endpoint: String,
    max_results: usize,
    rate_limiter: SharedRateLimiter,
}

impl DuckDuckGoClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `endpoint` - HTML results endpoint
    /// * `rate_limit` - Requests per minute
    /// * `max_results` - Number of snippets kept per query
    pub fn new(
        client: Client,
        endpoint: impl Into<String>,
        rate_limit: u32,
        max_results: usize,
    ) -> Self {
        let quota = Quota::per_minute(NonZeroU32::new(rate_limit).unwrap_or(NonZeroU32::MIN));

        Self {
            client,
            endpoint: endpoint.into(),
            max_results,
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        }
    }

    /// Create a client from the tool configuration
    pub fn from_config(config: &StockConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self::new(
            client,
            &config.search_url,
            config.search_rate_limit,
            config.search_max_results,
        ))
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoClient {
    async fn search(&self, query: &str) -> Result<String, ApiError> {
        self.rate_limiter.until_ready().await;
        debug!(query, "Searching DuckDuckGo");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(ApiError::Search(format!("DuckDuckGo returned HTTP {status}")));
        }

        let html = response.text().await?;
        let snippets = extract_snippets(&html, self.max_results)?;
        debug!(query, results = snippets.len(), "Search finished");

        Ok(snippets.join(" "))
    }
}

/// Pull result snippets out of a DuckDuckGo HTML results page
fn extract_snippets(html: &str, max_results: usize) -> Result<Vec<String>, ApiError> {
    let selector = Selector::parse(".result__snippet")
        .map_err(|e| ApiError::Search(format!("Invalid snippet selector: {e}")))?;
    let document = Html::parse_document(html);

    Ok(document
        .select(&selector)
        .map(|el| el.text().collect::<String>())
        .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|text| !text.is_empty())
        .take(max_results)
        .collect())
}

//! Configuration for the financial tools

use crate::error::{Result, StockError};
use finflow_llm::providers::ollama::DEFAULT_OLLAMA_BASE_URL;
use finflow_utils::{ConfigError, env_parse, env_var};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Default model served by the local Ollama instance
pub const DEFAULT_MODEL: &str = "llama3.2:latest";

/// DuckDuckGo's JavaScript-free results page
pub const DEFAULT_SEARCH_URL: &str = "https://html.duckduckgo.com/html/";

/// Configuration for the financial tools
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockConfig {
    /// Base URL of the Ollama server
    pub ollama_base_url: String,

    /// Model used for every prompt
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum tokens generated per prompt
    pub max_tokens: usize,

    /// Request timeout for search and model calls
    pub request_timeout: Duration,

    /// Number of memoized results kept per tool
    pub cache_capacity: usize,

    /// Web search endpoint
    pub search_url: String,

    /// Web search requests allowed per minute
    pub search_rate_limit: u32,

    /// Maximum number of search snippets handed to the model
    pub search_max_results: usize,
}

impl Default for StockConfig {
    fn default() -> Self {
        Self {
            ollama_base_url: DEFAULT_OLLAMA_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.2,
            max_tokens: 2048,
            request_timeout: Duration::from_secs(300),
            cache_capacity: 50,
            search_url: DEFAULT_SEARCH_URL.to_string(),
            search_rate_limit: 20,
            search_max_results: 5,
        }
    }
}

impl StockConfig {
    /// Create a new configuration builder
    pub fn builder() -> StockConfigBuilder {
        StockConfigBuilder::default()
    }

    /// Build a configuration from defaults overridden by environment variables
    ///
    /// Reads `OLLAMA_BASE_URL`, `FINFLOW_MODEL`, `FINFLOW_TEMPERATURE`,
    /// `FINFLOW_MAX_TOKENS`, `FINFLOW_REQUEST_TIMEOUT_SECS`,
    /// `FINFLOW_CACHE_CAPACITY`, `FINFLOW_SEARCH_URL`,
    /// `FINFLOW_SEARCH_RATE_LIMIT` and `FINFLOW_SEARCH_MAX_RESULTS`.
    pub fn from_env() -> Result<Self> {
        Self::builder().with_env()?.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validate_http_url("ollama_base_url", &self.ollama_base_url)?;
        validate_http_url("search_url", &self.search_url)?;

        if self.model.trim().is_empty() {
            return Err(invalid("model must not be empty"));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(invalid("temperature must be between 0.0 and 2.0"));
        }

        if self.max_tokens == 0 {
            return Err(invalid("max_tokens must be greater than 0"));
        }

        if self.cache_capacity == 0 {
            return Err(invalid("cache_capacity must be greater than 0"));
        }

        if self.search_rate_limit == 0 {
            return Err(invalid("search_rate_limit must be greater than 0"));
        }

        if self.search_max_results == 0 {
            return Err(invalid("search_max_results must be greater than 0"));
        }

        Ok(())
    }
}

fn invalid(reason: &str) -> StockError {
    StockError::Config(ConfigError::Invalid(reason.to_string()))
}

fn validate_http_url(key: &str, raw: &str) -> Result<()> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidValue {
        key: key.to_string(),
        value: raw.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
            reason: format!("unsupported scheme '{scheme}'"),
        }
        .into()),
    }
}

/// Builder for StockConfig
#[derive(Debug, Default)]
pub struct StockConfigBuilder {
    ollama_base_url: Option<String>,
    model: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<usize>,
    request_timeout: Option<Duration>,
    cache_capacity: Option<usize>,
    search_url: Option<String>,
    search_rate_limit: Option<u32>,
    search_max_results: Option<usize>,
}

impl StockConfigBuilder {
    /// Set the Ollama base URL
    pub fn ollama_base_url(mut self, url: impl Into<String>) -> Self {
        self.ollama_base_url = Some(url.into());
        self
    }

    /// Set the model name
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum tokens per prompt
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the per-tool cache capacity
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = Some(capacity);
        self
    }

    /// Set the web search endpoint
    pub fn search_url(mut self, url: impl Into<String>) -> Self {
        self.search_url = Some(url.into());
        self
    }

    /// Set the web search rate limit (requests per minute)
    pub fn search_rate_limit(mut self, per_minute: u32) -> Self {
        self.search_rate_limit = Some(per_minute);
        self
    }

    /// Set the maximum number of search snippets
    pub fn search_max_results(mut self, max_results: usize) -> Self {
        self.search_max_results = Some(max_results);
        self
    }

    /// Fill unset fields from environment variables
    ///
    /// Values already set on the builder take precedence.
    pub fn with_env(mut self) -> Result<Self> {
        self.ollama_base_url = self.ollama_base_url.or_else(|| env_var("OLLAMA_BASE_URL"));
        self.model = self.model.or_else(|| env_var("FINFLOW_MODEL"));
        self.search_url = self.search_url.or_else(|| env_var("FINFLOW_SEARCH_URL"));

        if self.temperature.is_none() {
            self.temperature = env_parse("FINFLOW_TEMPERATURE")?;
        }
        if self.max_tokens.is_none() {
            self.max_tokens = env_parse("FINFLOW_MAX_TOKENS")?;
        }
        if self.request_timeout.is_none() {
            self.request_timeout =
                env_parse::<u64>("FINFLOW_REQUEST_TIMEOUT_SECS")?.map(Duration::from_secs);
        }
        if self.cache_capacity.is_none() {
            self.cache_capacity = env_parse("FINFLOW_CACHE_CAPACITY")?;
        }
        if self.search_rate_limit.is_none() {
            self.search_rate_limit = env_parse("FINFLOW_SEARCH_RATE_LIMIT")?;
        }
        if self.search_max_results.is_none() {
            self.search_max_results = env_parse("FINFLOW_SEARCH_MAX_RESULTS")?;
        }

        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> Result<StockConfig> {
        let defaults = StockConfig::default();

        let config = StockConfig {
            ollama_base_url: self.ollama_base_url.unwrap_or(defaults.ollama_base_url),
            model: self.model.unwrap_or(defaults.model),
            temperature: self.temperature.unwrap_or(defaults.temperature),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            cache_capacity: self.cache_capacity.unwrap_or(defaults.cache_capacity),
            search_url: self.search_url.unwrap_or(defaults.search_url),
            search_rate_limit: self.search_rate_limit.unwrap_or(defaults.search_rate_limit),
            search_max_results: self.search_max_results.unwrap_or(defaults.search_max_results),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StockConfig::default();
        assert_eq!(config.model, "llama3.2:latest");
        assert!((config.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.cache_capacity, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = StockConfig::builder()
            .model("mistral:7b")
            .ollama_base_url("http://gpu-box:11434")
            .cache_capacity(10)
            .request_timeout(Duration::from_secs(60))
            .build()
            .unwrap();

        assert_eq!(config.model, "mistral:7b");
        assert_eq!(config.ollama_base_url, "http://gpu-box:11434");
        assert_eq!(config.cache_capacity, 10);
        assert_eq!(config.request_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_validation_rejects_zero_capacity() {
        let config = StockConfig {
            cache_capacity: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_url() {
        let result = StockConfig::builder().ollama_base_url("localhost:11434").build();
        assert!(matches!(result, Err(StockError::Config(_))));

        let result = StockConfig::builder().search_url("ftp://example.com").build();
        assert!(matches!(result, Err(StockError::Config(_))));
    }

    #[test]
    fn test_validation_rejects_hot_temperature() {
        let config = StockConfig {
            temperature: 3.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    // Every field is set, so no environment variable is consulted
    #[test]
    fn test_with_env_keeps_builder_values() {
        let config = StockConfig::builder()
            .ollama_base_url("http://gpu-box:11434")
            .model("explicit-model")
            .temperature(0.7)
            .max_tokens(256)
            .request_timeout(Duration::from_secs(5))
            .cache_capacity(3)
            .search_url("https://search.example.com/html/")
            .search_rate_limit(2)
            .search_max_results(1)
            .with_env()
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.ollama_base_url, "http://gpu-box:11434");
        assert_eq!(config.model, "explicit-model");
        assert!((config.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.max_tokens, 256);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.cache_capacity, 3);
        assert_eq!(config.search_url, "https://search.example.com/html/");
        assert_eq!(config.search_rate_limit, 2);
        assert_eq!(config.search_max_results, 1);
    }
}

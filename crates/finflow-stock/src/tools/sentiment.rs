//! Sentiment classification tool (`analyze_sentiment`)

use super::external_failure;
use crate::cache::{CacheKey, MemoCache};
use crate::error::{Result, StockError};
use crate::llm::ModelClient;
use crate::prompts::Prompts;
use async_trait::async_trait;
use finflow_tools::{Tool, parse_arguments};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::info;

const ACTION: &str = "analyze sentiment";

#[derive(Debug, Deserialize)]
struct SentimentParams {
    text: String,
}

/// Asks the model whether a text reads Positive, Negative or Neutral
pub struct SentimentTool {
    model: Arc<ModelClient>,
    prompts: Arc<Prompts>,
    cache: MemoCache<String>,
}

impl SentimentTool {
    pub fn new(model: Arc<ModelClient>, prompts: Arc<Prompts>, cache_capacity: usize) -> Self {
        Self {
            model,
            prompts,
            cache: MemoCache::new(cache_capacity),
        }
    }

    /// Classify `text`; the reply carries `Sentiment:` and `Reason:` lines
    pub async fn analyze(&self, text: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Err(StockError::InvalidText);
        }

        let key = CacheKey::new("sentiment", text);
        self.cache
            .get_or_fetch(key, || async {
                info!(chars = text.len(), "Analyzing sentiment");
                let subject: String = text.chars().take(40).collect();

                let prompt = self
                    .prompts
                    .sentiment(text)
                    .map_err(|e| external_failure(ACTION, &subject, e))?;
                self.model
                    .ask(prompt)
                    .await
                    .map_err(|e| external_failure(ACTION, &subject, e))
            })
            .await
    }

    /// Tool output: the classification, or `Error: ...`
    pub async fn render(&self, text: &str) -> String {
        self.analyze(text).await.unwrap_or_else(|e| e.to_text())
    }
}

#[async_trait]
impl Tool for SentimentTool {
    async fn call(&self, arguments: Value) -> finflow_tools::Result<String> {
        let params: SentimentParams = parse_arguments(self.name(), arguments)?;
        Ok(self.render(&params.text).await)
    }

    fn name(&self) -> &str {
        "analyze_sentiment"
    }

    fn description(&self) -> &str {
        "Classify the sentiment of a financial text as Positive, Negative or Neutral, with a short reason."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "text": {
                    "type": "string",
                    "description": "Text to classify, e.g. a news summary"
                }
            },
            "required": ["text"]
        })
    }
}

//! Single-prompt access to the language model

use crate::config::StockConfig;
use finflow_llm::{CompletionRequest, LLMError, LLMProvider, Message};
use std::sync::Arc;
use tracing::debug;

/// Sends one prompt at a time with the configured model and sampling settings
pub struct ModelClient {
    provider: Arc<dyn LLMProvider>,
    model: String,
    temperature: f32,
    max_tokens: usize,
}

impl ModelClient {
    /// Create a client over the given provider
    pub fn new(provider: Arc<dyn LLMProvider>, config: &StockConfig) -> Self {
        Self {
            provider,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    /// Send a prompt as a single user message and return the reply text
    pub async fn ask(&self, prompt: String) -> finflow_llm::Result<String> {
        let request = CompletionRequest::builder(&self.model)
            .add_message(Message::user(prompt))
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build();

        let response = self.provider.complete(request).await?;
        debug!(
            provider = self.provider.name(),
            tokens = response.usage.total(),
            "Model replied"
        );

        response
            .message
            .text()
            .map(str::to_string)
            .ok_or(LLMError::EmptyResponse)
    }
}

//! Ollama provider implementation
//!
//! Talks to a local Ollama server through its non-streaming chat endpoint.
//! See: https://github.com/ollama/ollama/blob/main/docs/api.md#generate-a-chat-completion
//!
//! # Example
//!
//! ```no_run
//! use finflow_llm::{CompletionRequest, LLMProvider, Message};
//! use finflow_llm::providers::{OllamaConfig, OllamaProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = OllamaProvider::with_config(
//!         OllamaConfig::new("http://localhost:11434").with_timeout(300),
//!     )?;
//!
//!     let request = CompletionRequest::builder("llama3.2:latest")
//!         .add_message(Message::user("Summarize today's market in one line."))
//!         .temperature(0.2)
//!         .build();
//!
//!     let response = provider.complete(request).await?;
//!     println!("{}", response.message.content);
//!     Ok(())
//! }
//! ```

use crate::{
    CompletionRequest, CompletionResponse, LLMError, LLMProvider, Message, Result, Role,
    StopReason, TokenUsage,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Default address of a local Ollama server
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Configuration for the Ollama provider
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Base URL of the Ollama server (default: "http://localhost:11434")
    pub base_url: String,

    /// Request timeout in seconds (default: 300)
    pub timeout_secs: u64,
}

impl OllamaConfig {
    /// Create a new config pointing at the given server
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url.trim_end_matches('/'))
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self::new(DEFAULT_OLLAMA_BASE_URL)
    }
}

/// Ollama provider
///
/// Any model pulled into the local Ollama server can be used; the model name
/// travels with each request.
pub struct OllamaProvider {
    client: Client,
    config: OllamaConfig,
}

impl OllamaProvider {
    /// Create a provider with custom configuration
    pub fn with_config(config: OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl LLMProvider for OllamaProvider {
    #[instrument(skip(self, request), fields(model = %request.model, base_url = %self.config.base_url))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        debug!("Sending chat request to Ollama");

        let model = request.model.clone();
        let body = build_chat_request(request);

        let response = self
            .client
            .post(self.config.chat_url())
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            let detail = serde_json::from_str::<OllamaErrorBody>(&error_text)
                .map(|b| b.error)
                .unwrap_or(error_text);

            return Err(match status.as_u16() {
                404 => LLMError::ModelNotFound(model),
                400 => LLMError::InvalidRequest(detail),
                _ => LLMError::RequestFailed(format!("HTTP {status}: {detail}")),
            });
        }

        let chat: OllamaChatResponse = response.json().await.map_err(|e| {
            LLMError::UnexpectedResponse(format!("Failed to parse response: {e}"))
        })?;

        let completion = parse_chat_response(chat)?;
        debug!(
            "Received response - stop_reason: {:?}, tokens: {}/{}",
            completion.stop_reason, completion.usage.input_tokens, completion.usage.output_tokens
        );

        Ok(completion)
    }

    fn name(&self) -> &'static str {
        "ollama"
    }
}

// ============================================================================
// Ollama-specific wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    #[serde(default)]
    content: String,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    num_predict: usize,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: Option<OllamaMessage>,
    #[serde(default)]
    done_reason: Option<String>,
    #[serde(default)]
    prompt_eval_count: usize,
    #[serde(default)]
    eval_count: usize,
}

#[derive(Debug, Deserialize)]
struct OllamaErrorBody {
    error: String,
}

// ============================================================================
// Conversion functions
// ============================================================================

fn role_name(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "assistant",
    }
}

fn build_chat_request(request: CompletionRequest) -> OllamaChatRequest {
    let messages = request
        .messages
        .into_iter()
        .map(|m| OllamaMessage {
            role: role_name(m.role).to_string(),
            content: m.content,
        })
        .collect();

    OllamaChatRequest {
        model: request.model,
        messages,
        stream: false,
        options: OllamaOptions {
            temperature: request.temperature,
            num_predict: request.max_tokens,
        },
    }
}

fn map_stop_reason(reason: Option<&str>) -> StopReason {
    match reason {
        Some("length") => StopReason::MaxTokens,
        _ => StopReason::EndTurn,
    }
}

fn parse_chat_response(chat: OllamaChatResponse) -> Result<CompletionResponse> {
    let message = chat
        .message
        .ok_or_else(|| LLMError::UnexpectedResponse("No message in response".to_string()))?;

    Ok(CompletionResponse {
        message: Message::assistant(message.content),
        stop_reason: map_stop_reason(chat.done_reason.as_deref()),
        usage: TokenUsage {
            input_tokens: chat.prompt_eval_count,
            output_tokens: chat.eval_count,
        },
    })
}

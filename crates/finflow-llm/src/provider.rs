//! LLM provider trait definition

use crate::{CompletionRequest, CompletionResponse, Result};
use async_trait::async_trait;

/// A language model backend
///
/// Callers hold providers as `Arc<dyn LLMProvider>`, so tests can swap in a
/// scripted fake for the real server.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Run one non-streaming completion
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Short backend name used in logs, e.g. `"ollama"`
    fn name(&self) -> &str;
}

//! Concrete LLM provider implementations
//!
//! This module contains implementations of the LLMProvider trait for
//! the language model services FinFlow talks to.

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "ollama")]
pub use ollama::{OllamaConfig, OllamaProvider};

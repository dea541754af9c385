//! Errors raised while asking a language model for a completion

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LLMError>;

#[derive(Error, Debug)]
pub enum LLMError {
    /// The model server answered with a failure status
    #[error("Model request failed: {0}")]
    RequestFailed(String),

    /// The model server refused the request body
    #[error("Model rejected the request: {0}")]
    InvalidRequest(String),

    /// The named model has not been pulled into the server
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// The model server could not be reached
    #[cfg(feature = "ollama")]
    #[error("Could not reach the model server: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The reply did not have the expected shape
    #[error("Malformed model response: {0}")]
    UnexpectedResponse(String),

    #[error("Model returned an empty response")]
    EmptyResponse,
}

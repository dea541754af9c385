//! Error types for the MCP server

use thiserror::Error;

/// Errors that end an MCP session
///
/// Problems with individual requests are answered in-band by the protocol
/// layer and never surface here.
#[derive(Error, Debug)]
pub enum McpError {
    /// The client never completed the initialize handshake
    #[error("MCP initialization failed: {0}")]
    Initialize(String),

    /// The running session stopped abnormally
    #[error("MCP session failed: {0}")]
    Session(String),
}

/// Result type for MCP operations
pub type Result<T> = std::result::Result<T, McpError>;

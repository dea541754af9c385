//! Error types for tool dispatch

use thiserror::Error;

/// Result type alias for tool dispatch
pub type Result<T> = std::result::Result<T, ToolError>;

/// Errors raised before a tool gets to run
///
/// Failures inside a tool are part of its text output; these cover the cases
/// where no output can be produced at all.
#[derive(Error, Debug)]
pub enum ToolError {
    /// No tool registered under this name
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Arguments did not match the tool's input schema
    #[error("Invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },
}

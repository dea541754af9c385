//! Tool management and dispatch for FinFlow
//!
//! This crate provides the framework for defining tools (named functions with
//! a JSON-schema input and a text output) and looking them up by name.

pub mod error;
pub mod registry;
pub mod tool;

pub use error::{Result, ToolError};
pub use registry::ToolRegistry;
pub use tool::{Tool, ToolDefinition, parse_arguments};

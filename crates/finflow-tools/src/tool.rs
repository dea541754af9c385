//! Tool trait definition

use crate::{Result, ToolError};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Trait for tools exposed to agents
///
/// Each tool provides a name, a description, and a JSON schema for its input.
/// The output is always text; a tool that fails reports the failure inside
/// that text so the calling agent can read it.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Run the tool with the given arguments
    ///
    /// # Arguments
    ///
    /// * `arguments` - Tool input as JSON value (should match input_schema)
    ///
    /// # Returns
    ///
    /// The tool's text output, or an error when the arguments cannot be decoded
    async fn call(&self, arguments: Value) -> Result<String>;

    /// Get the tool's name
    ///
    /// Must be unique within a ToolRegistry
    fn name(&self) -> &str;

    /// Get the tool's description
    ///
    /// This description helps the agent understand when to use this tool
    fn description(&self) -> &str;

    /// Get the tool's input schema (JSON Schema format)
    fn input_schema(&self) -> Value;

    /// Definition advertised to clients
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}

/// Tool definition as listed to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Decode tool arguments into a typed parameter struct
///
/// A missing argument object (`null`) is treated as `{}` so tools whose
/// parameters all have defaults can be called bare.
pub fn parse_arguments<T: DeserializeOwned>(tool: &str, arguments: Value) -> Result<T> {
    let arguments = if arguments.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        arguments
    };

    serde_json::from_value(arguments).map_err(|e| ToolError::InvalidArguments {
        tool: tool.to_string(),
        reason: e.to_string(),
    })
}

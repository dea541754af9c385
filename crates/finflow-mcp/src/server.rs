//! MCP server handler over a tool registry
//!
//! The protocol layer (framing, initialization, pings, error codes) comes from
//! `rmcp`. This handler only lists the registry's tools and routes calls to
//! them. Tool output, including `Error: ...` text, is returned as a normal
//! result; only an unknown tool or undecodable arguments set `isError`.

use crate::{McpError, Result};
use finflow_tools::{ToolDefinition, ToolRegistry};
use rmcp::model::{
    CallToolRequestParams, CallToolResult, Content, ErrorData, Implementation, JsonObject,
    ListToolsResult, PaginatedRequestParams, ProtocolVersion, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::transport::io::stdio;
use rmcp::{ServerHandler, ServiceExt};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const SERVER_NAME: &str = "FinFlow";

/// MCP server exposing the tools of a registry
#[derive(Clone)]
pub struct McpServer {
    registry: Arc<ToolRegistry>,
}

impl McpServer {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    /// Serve on the process's stdin and stdout until the client disconnects
    pub async fn run_stdio(self) -> Result<()> {
        info!(tools = self.registry.len(), "MCP server ready");

        let service = self
            .serve(stdio())
            .await
            .map_err(|e| McpError::Initialize(e.to_string()))?;
        service
            .waiting()
            .await
            .map_err(|e| McpError::Session(e.to_string()))?;

        info!("Input closed, shutting down");
        Ok(())
    }

    /// Tools in registry order, converted for the wire
    pub fn tools(&self) -> Vec<Tool> {
        self.registry
            .definitions()
            .into_iter()
            .map(tool_entry)
            .collect()
    }

    /// Run one tool and wrap its outcome
    pub async fn run_tool(&self, name: &str, arguments: Option<JsonObject>) -> CallToolResult {
        info!(tool = %name, "Calling tool");
        let arguments = arguments.map_or(Value::Null, Value::Object);

        match self.registry.call(name, arguments).await {
            Ok(text) => CallToolResult::success(vec![Content::text(text)]),
            Err(e) => {
                warn!(tool = %name, error = %e, "Tool call rejected");
                CallToolResult::error(vec![Content::text(e.to_string())])
            }
        }
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                title: Some("FinFlow financial tools".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                description: None,
                icons: None,
                website_url: None,
            },
            instructions: None,
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, ErrorData> {
        debug!("Listing tools");
        Ok(ListToolsResult::with_all_items(self.tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        Ok(self.run_tool(&request.name, request.arguments).await)
    }
}

/// A schema that is not an object is advertised as `{}`
fn tool_entry(definition: ToolDefinition) -> Tool {
    let schema = match definition.input_schema {
        Value::Object(map) => map,
        _ => JsonObject::new(),
    };
    Tool::new(definition.name, definition.description, Arc::new(schema))
}

//! Model Context Protocol server for FinFlow
//!
//! Serves the tools of a [`ToolRegistry`](finflow_tools::ToolRegistry) through
//! an `rmcp` server handler, normally over stdin and stdout.
//!
//! # Example
//!
//! ```no_run
//! use finflow_mcp::McpServer;
//! use finflow_stock::{StockConfig, StockToolkit};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = StockConfig::from_env()?;
//! let registry = StockToolkit::from_config(&config)?.registry();
//!
//! McpServer::new(Arc::new(registry)).run_stdio().await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod server;

pub use error::{McpError, Result};
pub use server::McpServer;

//! Command-line interface for FinFlow

use anyhow::Context;
use clap::{Parser, Subcommand};
use finflow_mcp::McpServer;
use finflow_stock::{StockConfig, StockToolkit};
use finflow_utils::{LogFormat, init_tracing};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "finflow", version)]
#[command(about = "Financial news, prices and advice as MCP tools", long_about = None)]
struct Cli {
    /// Ollama server URL (overrides OLLAMA_BASE_URL)
    #[arg(long, global = true)]
    ollama_url: Option<String>,

    /// Model name (overrides FINFLOW_MODEL)
    #[arg(long, global = true)]
    model: Option<String>,

    /// Log output format: pretty or json
    #[arg(long, global = true, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the MCP server on stdin/stdout (default)
    Serve,
    /// Run a single tool and print its output
    Call {
        /// Tool name, e.g. get_stock_data
        tool: String,
        /// Tool arguments as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,
    },
    /// Print the tool definitions as JSON
    List,
}

impl Cli {
    fn config(&self) -> anyhow::Result<StockConfig> {
        let mut builder = StockConfig::builder();
        if let Some(url) = &self.ollama_url {
            builder = builder.ollama_base_url(url);
        }
        if let Some(model) = &self.model {
            builder = builder.model(model);
        }
        Ok(builder.with_env()?.build()?)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format, "info").context("failed to initialize logging")?;

    let config = cli.config().context("invalid configuration")?;
    let toolkit = StockToolkit::from_config(&config)?;
    let registry = Arc::new(toolkit.registry());

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            info!(model = %config.model, ollama = %config.ollama_base_url, "Starting FinFlow");
            McpServer::new(registry).run_stdio().await?;
        }
        Command::Call { tool, args } => {
            let arguments: Value =
                serde_json::from_str(&args).context("--args must be valid JSON")?;
            let output = registry.call(&tool, arguments).await?;
            println!("{output}");
        }
        Command::List => {
            println!("{}", serde_json::to_string_pretty(&registry.definitions())?);
        }
    }

    Ok(())
}

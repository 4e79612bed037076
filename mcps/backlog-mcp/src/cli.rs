//! Command-line interface for the `backlog-mcp` binary

use anyhow::Context;
use clap::{Parser, Subcommand};
use mcp_common::EmbeddableMcp;
use rmcp::{transport::stdio, ServiceExt};
use serde_json::Value;
use tracing::{info, warn};

use crate::backlog::{is_initialized, SUPPORTED_VERSION};
use crate::config::{parse_cli_value, ConfigStore};
use crate::resources::BacklogResource;
use crate::server::BacklogMcpServer;

#[derive(Parser)]
#[command(name = "backlog-mcp")]
#[command(version, about = "MCP server for Backlog.md task management")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Debug logging for this crate (RUST_LOG still takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve MCP over stdio (default)
    Start,
    /// Read or change the local server configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Check the project directory and the backlog CLI installation
    Validate,
    /// Show server, CLI and catalog information
    Info,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the whole config file
    Show,
    /// Print one value
    Get { key: String },
    /// Store a value, e.g. `config set backlogCliPath /usr/local/bin/backlog`
    Set { key: String, value: String },
}

pub async fn serve() -> anyhow::Result<()> {
    info!("Starting Backlog.md MCP Server");

    let server = BacklogMcpServer::new();
    let runner = server.runner();
    if !is_initialized(runner.project_dir()) {
        warn!(
            project_dir = %runner.project_dir().display(),
            "Backlog.md is not initialized here; tool calls will fail until `backlog init` is run"
        );
    }

    // Continue regardless; failures are reported per tool call
    let report = runner.check_version_compatibility().await;
    if !report.is_compatible || report.is_newer {
        warn!("{}", report.summary());
    } else {
        info!("{}", report.summary());
    }

    let service = server.serve(stdio()).await?;

    info!("Server running, waiting for requests...");

    service.waiting().await?;

    info!("Server shutting down");
    Ok(())
}

pub fn config(command: ConfigCommands) -> anyhow::Result<()> {
    let store = ConfigStore::from_env()?;

    match command {
        ConfigCommands::Show => {
            let config = Value::Object(store.load());
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigCommands::Get { key } => match store.get(&key)? {
            Some(Value::String(s)) => println!("{}", s),
            Some(other) => println!("{}", other),
            None => anyhow::bail!("{} is not set in {}", key, store.path().display()),
        },
        ConfigCommands::Set { key, value } => {
            store
                .set(&key, parse_cli_value(&value))
                .with_context(|| format!("could not update {}", store.path().display()))?;
            println!("Set {} in {}", key, store.path().display());
        }
    }
    Ok(())
}

pub async fn validate() -> anyhow::Result<()> {
    let server = BacklogMcpServer::new();
    let runner = server.runner();
    let project_dir = runner.project_dir();

    let initialized = is_initialized(project_dir);
    println!("Project directory: {}", project_dir.display());
    println!(
        "Backlog.md initialized: {}",
        if initialized { "yes" } else { "no" }
    );

    let exe = runner.executable().await;
    println!("Backlog CLI: {} ({})", exe.path, exe.strategy);

    let report = runner.check_version_compatibility().await;
    println!("{}", report.summary());

    if !initialized {
        anyhow::bail!("run `backlog init` in {} first", project_dir.display());
    }
    Ok(())
}

pub async fn info() -> anyhow::Result<()> {
    let server = BacklogMcpServer::new();
    let runner = server.runner();
    let exe = runner.executable().await;

    println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    println!("Supported backlog version: {}", SUPPORTED_VERSION);
    println!("Backlog CLI: {} ({})", exe.path, exe.strategy);
    println!("Project directory: {}", runner.project_dir().display());
    if let Ok(store) = ConfigStore::from_env() {
        println!("Config file: {}", store.path().display());
    }

    println!("\nTools:");
    let mut tools = server.list_tools();
    tools.sort_by(|a, b| a.name.cmp(&b.name));
    for tool in tools {
        println!("  {}", tool.name);
    }

    println!("\nResources:");
    for resource in BacklogResource::ALL {
        println!("  {:<30} {}", resource.uri(), resource.description());
    }
    Ok(())
}

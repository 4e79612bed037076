//! Backlog.md MCP Server
//!
//! Wraps the Backlog.md CLI (`backlog`) to provide MCP-compatible tools
//! and resources for task, board and documentation management.
//!
//! # Usage
//!
//! Run directly (stdio transport):
//! ```bash
//! backlog-mcp            # same as `backlog-mcp start`
//! backlog-mcp start -v   # debug logging
//! backlog-mcp validate   # check project and CLI installation
//! ```
//!
//! Or configure in `.mcp.json`:
//! ```json
//! {
//!   "mcpServers": {
//!     "backlog": {
//!       "command": "./mcps/backlog-mcp/target/release/backlog-mcp"
//!     }
//!   }
//! }
//! ```

use clap::Parser;
use mcp_common::{init_tracing, LogLevel};

use backlog_mcp::cli::{self, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };
    init_tracing("backlog_mcp", level)?;

    match cli.command.unwrap_or(Commands::Start) {
        Commands::Start => cli::serve().await,
        Commands::Config { command } => cli::config(command),
        Commands::Validate => cli::validate().await,
        Commands::Info => cli::info().await,
    }
}

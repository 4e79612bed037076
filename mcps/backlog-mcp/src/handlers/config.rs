//! Backlog configuration handler implementations
//!
//! These read and write the backlog project's configuration through the
//! CLI, not the server's own local config.

use mcp_common::{tool_error, CallToolResult, McpError};

use crate::backlog::CommandRunner;
use crate::config::is_valid_config_key;
use crate::params::{ConfigGetParams, ConfigSetParams};

use super::{run_tool, Argv};

fn invalid_key(key: &str) -> CallToolResult {
    tool_error(format!("Invalid configuration key: {}", key))
}

pub async fn config_get(
    runner: &CommandRunner,
    params: ConfigGetParams,
) -> Result<CallToolResult, McpError> {
    if !is_valid_config_key(&params.key) {
        return Ok(invalid_key(&params.key));
    }
    Ok(run_tool(runner, Argv::new(&["config", "get"]).arg(params.key)).await)
}

pub async fn config_set(
    runner: &CommandRunner,
    params: ConfigSetParams,
) -> Result<CallToolResult, McpError> {
    if !is_valid_config_key(&params.key) {
        return Ok(invalid_key(&params.key));
    }
    let argv = Argv::new(&["config", "set"])
        .arg(params.key)
        .arg(params.value);
    Ok(run_tool(runner, argv).await)
}

pub async fn config_list(runner: &CommandRunner) -> Result<CallToolResult, McpError> {
    Ok(run_tool(runner, Argv::new(&["config", "list"])).await)
}

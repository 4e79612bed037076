//! Board, overview and sequence handler implementations

use mcp_common::{CallToolResult, McpError};

use crate::backlog::CommandRunner;
use crate::params::BoardExportParams;

use super::{run_tool, Argv};

pub fn board_export_args(params: &BoardExportParams) -> Argv {
    let mut argv = Argv::new(&["board", "export"]);
    if let Some(filename) = params.filename.as_deref().filter(|f| !f.is_empty()) {
        argv = argv.arg(filename);
    }
    argv.switch("--force", params.force)
        .switch("--readme", params.readme)
        .opt("--export-version", params.export_version.as_deref())
}

/// Show the Kanban board
pub async fn board_show(runner: &CommandRunner) -> Result<CallToolResult, McpError> {
    Ok(run_tool(runner, Argv::new(&["board", "view"])).await)
}

/// Export the Kanban board to markdown
pub async fn board_export(
    runner: &CommandRunner,
    params: BoardExportParams,
) -> Result<CallToolResult, McpError> {
    Ok(run_tool(runner, board_export_args(&params)).await)
}

pub async fn overview(runner: &CommandRunner) -> Result<CallToolResult, McpError> {
    Ok(run_tool(runner, Argv::new(&["overview"])).await)
}

/// Execution sequences derived from task dependencies
pub async fn sequence_list(runner: &CommandRunner) -> Result<CallToolResult, McpError> {
    Ok(run_tool(runner, Argv::new(&["sequence", "list", "--plain"])).await)
}

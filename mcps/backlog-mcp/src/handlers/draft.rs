//! Draft handler implementations

use mcp_common::{CallToolResult, McpError};

use crate::backlog::CommandRunner;
use crate::params::{DraftCreateParams, DraftIdParams};

use super::{run_tool, Argv};

pub fn draft_create_args(params: &DraftCreateParams) -> Argv {
    Argv::new(&["draft", "create"])
        .arg(params.title.as_str())
        .opt("--description", params.description.as_deref())
        .opt("--assignee", params.assignee.as_deref())
        .opt("--labels", params.labels.as_deref())
}

/// Create a new draft task
pub async fn draft_create(
    runner: &CommandRunner,
    params: DraftCreateParams,
) -> Result<CallToolResult, McpError> {
    Ok(run_tool(runner, draft_create_args(&params)).await)
}

/// List all drafts
pub async fn draft_list(runner: &CommandRunner) -> Result<CallToolResult, McpError> {
    Ok(run_tool(runner, Argv::new(&["draft", "list", "--plain"])).await)
}

/// Promote a draft to a task
pub async fn draft_promote(
    runner: &CommandRunner,
    params: DraftIdParams,
) -> Result<CallToolResult, McpError> {
    Ok(run_tool(runner, Argv::new(&["draft", "promote"]).arg(params.task_id)).await)
}

pub async fn draft_archive(
    runner: &CommandRunner,
    params: DraftIdParams,
) -> Result<CallToolResult, McpError> {
    Ok(run_tool(runner, Argv::new(&["draft", "archive"]).arg(params.task_id)).await)
}

pub async fn draft_view(
    runner: &CommandRunner,
    params: DraftIdParams,
) -> Result<CallToolResult, McpError> {
    let argv = Argv::new(&["draft", "view"]).arg(params.task_id).arg("--plain");
    Ok(run_tool(runner, argv).await)
}

//! Documentation and decision handler implementations

use mcp_common::{text_success, CallToolResult, McpError};

use crate::backlog::CommandRunner;
use crate::decisions::render_decisions;
use crate::params::{DecisionCreateParams, DocCreateParams, DocViewParams};

use super::{run_tool, Argv};

pub fn doc_create_args(params: &DocCreateParams) -> Argv {
    Argv::new(&["doc", "create"])
        .arg(params.title.as_str())
        .opt("--path", params.path.as_deref())
        .opt("--type", params.doc_type.as_deref())
}

pub fn decision_create_args(params: &DecisionCreateParams) -> Argv {
    Argv::new(&["decision", "create"])
        .arg(params.title.as_str())
        .opt("--status", params.status.as_ref().map(|s| s.as_str()))
}

/// Create a documentation file
pub async fn doc_create(
    runner: &CommandRunner,
    params: DocCreateParams,
) -> Result<CallToolResult, McpError> {
    Ok(run_tool(runner, doc_create_args(&params)).await)
}

pub async fn doc_list(runner: &CommandRunner) -> Result<CallToolResult, McpError> {
    Ok(run_tool(runner, Argv::new(&["doc", "list", "--plain"])).await)
}

pub async fn doc_view(
    runner: &CommandRunner,
    params: DocViewParams,
) -> Result<CallToolResult, McpError> {
    Ok(run_tool(runner, Argv::new(&["doc", "view"]).arg(params.doc_id)).await)
}

/// Create a decision record
pub async fn decision_create(
    runner: &CommandRunner,
    params: DecisionCreateParams,
) -> Result<CallToolResult, McpError> {
    Ok(run_tool(runner, decision_create_args(&params)).await)
}

/// List decision records from the project's `backlog/decisions` directory
///
/// Read failures are reported in the text, not as a failed call.
pub async fn decision_list(runner: &CommandRunner) -> Result<CallToolResult, McpError> {
    Ok(text_success(render_decisions(runner.project_dir()).await))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::DecisionStatus;

    #[test]
    fn test_doc_create_args() {
        let params = DocCreateParams {
            title: "Setup".into(),
            path: Some("guides/setup".into()),
            doc_type: Some("technical".into()),
        };
        assert_eq!(
            doc_create_args(&params).into_vec(),
            vec!["doc", "create", "Setup", "--path", "guides/setup", "--type", "technical"]
        );
    }

    #[test]
    fn test_decision_create_args() {
        let params = DecisionCreateParams {
            title: "Use SQLite".into(),
            status: Some(DecisionStatus::Accepted),
        };
        assert_eq!(
            decision_create_args(&params).into_vec(),
            vec!["decision", "create", "Use SQLite", "--status", "accepted"]
        );
    }
}

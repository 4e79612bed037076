//! Task handler implementations

use std::future::Future;
use std::sync::LazyLock;

use mcp_common::{text_success, tool_result, CallToolResult, McpError};
use regex::Regex;
use tracing::debug;

use crate::backlog::CommandRunner;
use crate::params::{TaskCreateParams, TaskEditParams, TaskIdParams, TaskListParams};

use super::{run_tool, trimmed, Argv};

static TASK_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"task-\d+(?:\.\d+)*").expect("task ref pattern is valid"));
static LABELS_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Labels:\s*(.+)").expect("labels pattern is valid"));

pub fn task_create_args(params: &TaskCreateParams) -> Argv {
    let labels = params
        .labels
        .as_ref()
        .filter(|l| !l.is_empty())
        .map(|l| l.join(","));

    Argv::new(&["task", "create"])
        .arg(params.title.as_str())
        .arg("--plain")
        .opt("--description", params.description.as_deref())
        .opt("--status", params.status.as_deref())
        .opt("--priority", params.priority.as_ref().map(|p| p.as_str()))
        .opt("--assignee", params.assignee.as_deref())
        .opt("--plan", params.plan.as_deref())
        .opt("--notes", params.notes.as_deref())
        .opt("--dep", params.dependencies.as_deref())
        .opt("--parent", params.parent.as_deref())
        .switch("--draft", params.draft)
        .opt("--labels", labels.as_deref())
        .each("--ac", params.ac.as_deref())
}

pub fn task_list_args(params: &TaskListParams) -> Argv {
    Argv::new(&["task", "list", "--plain"])
        .opt("--status", params.status.as_deref().filter(|s| *s != "all"))
        .opt("--priority", params.priority.as_ref().map(|p| p.as_str()))
        .opt("--assignee", params.assignee.as_deref())
        .opt("--parent", params.parent.as_deref())
        .opt("--sort", params.sort.as_ref().map(|s| s.as_str()))
}

pub fn task_edit_args(params: &TaskEditParams) -> Argv {
    // 0 means unset
    let ordinal = params.ordinal.filter(|o| *o != 0).map(|o| o.to_string());

    Argv::new(&["task", "edit"])
        .arg(params.task_id.as_str())
        .arg("--plain")
        .opt("--title", params.title.as_deref())
        .opt("--description", params.description.as_deref())
        .opt("--status", params.status.as_deref())
        .opt("--priority", params.priority.as_ref().map(|p| p.as_str()))
        .opt("--assignee", params.assignee.as_deref())
        .opt("--plan", params.plan.as_deref())
        .opt("--notes", params.notes.as_deref())
        .opt("--dep", params.dependencies.as_deref())
        .opt("--ordinal", ordinal.as_deref())
        .opt("--add-label", params.add_label.as_deref())
        .opt("--remove-label", params.remove_label.as_deref())
        .each("--ac", params.ac.as_deref())
        .each("--remove-ac", params.remove_ac.as_deref())
        .each("--check-ac", params.check_ac.as_deref())
        .each("--uncheck-ac", params.uncheck_ac.as_deref())
}

fn task_view_args(task_id: &str) -> Argv {
    Argv::new(&["task", "view"]).arg(task_id).arg("--plain")
}

/// Whether a `task view --plain` dump lists `label` (case-insensitive)
pub fn task_has_label(view: &str, label: &str) -> bool {
    let wanted = label.to_lowercase();
    LABELS_LINE
        .captures(view)
        .map(|c| {
            c[1].split(',')
                .any(|l| l.trim().to_lowercase() == wanted)
        })
        .unwrap_or(false)
}

/// Keep the task lines of a listing whose task carries `label`
///
/// Blank lines, section headers (ending in `:`) and lines without a task
/// reference pass through. `view` fetches a task's plain dump by ID;
/// `None` drops the line.
pub async fn filter_by_label<F, Fut>(listing: &str, label: &str, mut view: F) -> String
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Option<String>>,
{
    let mut kept = Vec::new();

    for line in listing.split('\n') {
        if line.trim().is_empty() || line.ends_with(':') || !line.contains("task-") {
            kept.push(line);
            continue;
        }

        let Some(task_ref) = TASK_REF.find(line) else {
            continue;
        };
        match view(task_ref.as_str().to_string()).await {
            Some(dump) if task_has_label(&dump, label) => kept.push(line),
            Some(_) => {}
            None => debug!(task = task_ref.as_str(), "dropping task, details unavailable"),
        }
    }

    kept.join("\n")
}

/// Text reported by `task_dependencies` for a task's plain dump
pub fn dependencies_summary(task_id: &str, view: &str) -> String {
    const PREFIX: &str = "Dependencies:";

    view.lines()
        .find_map(|line| line.strip_prefix(PREFIX))
        .map(str::trim)
        .filter(|deps| !deps.is_empty())
        .map(|deps| format!("**Dependencies:** {}", deps))
        .unwrap_or_else(|| format!("Task {} has no dependencies.", task_id))
}

/// Create a new task
pub async fn task_create(
    runner: &CommandRunner,
    params: TaskCreateParams,
) -> Result<CallToolResult, McpError> {
    Ok(run_tool(runner, task_create_args(&params)).await)
}

/// List tasks, optionally filtered by label on the server side
pub async fn task_list(
    runner: &CommandRunner,
    params: TaskListParams,
) -> Result<CallToolResult, McpError> {
    let listing = match trimmed(runner.run(&task_list_args(&params).into_vec()).await) {
        Ok(listing) => listing,
        Err(e) => return Ok(tool_result(Err(e))),
    };

    let Some(label) = params.label.as_deref().filter(|l| !l.is_empty()) else {
        return Ok(text_success(listing));
    };

    let filtered = filter_by_label(&listing, label, |task_id| async move {
        runner
            .run(&task_view_args(&task_id).into_vec())
            .await
            .ok()
    })
    .await;
    Ok(text_success(filtered))
}

/// Edit an existing task
pub async fn task_edit(
    runner: &CommandRunner,
    params: TaskEditParams,
) -> Result<CallToolResult, McpError> {
    Ok(run_tool(runner, task_edit_args(&params)).await)
}

/// View a task's details
pub async fn task_view(
    runner: &CommandRunner,
    params: TaskIdParams,
) -> Result<CallToolResult, McpError> {
    Ok(run_tool(runner, task_view_args(&params.task_id)).await)
}

/// Archive a task
pub async fn task_archive(
    runner: &CommandRunner,
    params: TaskIdParams,
) -> Result<CallToolResult, McpError> {
    let argv = Argv::new(&["task", "archive"]).arg(params.task_id);
    Ok(run_tool(runner, argv).await)
}

/// Demote a task back to a draft
pub async fn task_demote(
    runner: &CommandRunner,
    params: TaskIdParams,
) -> Result<CallToolResult, McpError> {
    let argv = Argv::new(&["task", "demote"]).arg(params.task_id);
    Ok(run_tool(runner, argv).await)
}

/// Report what a task depends on
pub async fn task_dependencies(
    runner: &CommandRunner,
    params: TaskIdParams,
) -> Result<CallToolResult, McpError> {
    let result = runner
        .run(&task_view_args(&params.task_id).into_vec())
        .await
        .map(|view| dependencies_summary(&params.task_id, &view));
    Ok(tool_result(result))
}

/// List the sub-tasks of a parent task
pub async fn task_children(
    runner: &CommandRunner,
    params: TaskIdParams,
) -> Result<CallToolResult, McpError> {
    let argv = Argv::new(&["task", "list", "--parent"])
        .arg(params.task_id.as_str())
        .arg("--plain");

    let result = trimmed(runner.run(&argv.into_vec()).await).map(|out| {
        if out.trim().is_empty() {
            format!("No child tasks found for {}.", params.task_id)
        } else {
            out
        }
    });
    Ok(tool_result(result))
}

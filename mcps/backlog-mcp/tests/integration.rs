//! Integration tests for the backlog MCP server
//!
//! Tools are driven through `EmbeddableMcp::call_tool` against a fake
//! `backlog` shell script, so no real Backlog.md installation is needed.
//! The script records each invocation by touching `.invoked` in the
//! project directory.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use backlog_mcp::backlog::{CommandRunner, ExecutableResolver, ProbeCommands};
use backlog_mcp::BacklogMcpServer;
use mcp_common::{CallToolResult, EmbeddableMcp};
use serde_json::json;
use tempfile::TempDir;

const FAKE_BACKLOG: &str = r#"#!/bin/sh
touch .invoked
if [ "$1" = "task" ] && [ "$2" = "view" ]; then
  case "$3" in
    task-1) printf 'Task task-1 - Login\nLabels: ui, auth\nDependencies: task-0\n' ;;
    task-2) printf 'Task task-2 - Docs\nLabels: docs\n' ;;
    *) echo "Task $3 not found" >&2; exit 1 ;;
  esac
  exit 0
fi
if [ "$1" = "task" ] && [ "$2" = "list" ]; then
  if [ "$3" = "--parent" ]; then
    exit 0
  fi
  printf 'To Do:\n  task-1 - Login\n  task-2 - Docs\n'
  exit 0
fi
for a in "$@"; do printf '%s\n' "$a"; done
"#;

struct Fixture {
    _dir: TempDir,
    project: PathBuf,
    server: BacklogMcpServer,
}

fn fixture(initialized: bool) -> Fixture {
    let dir = TempDir::new().unwrap();

    let exe = dir.path().join("backlog");
    std::fs::write(&exe, FAKE_BACKLOG).unwrap();
    std::fs::set_permissions(&exe, std::fs::Permissions::from_mode(0o755)).unwrap();

    let project = dir.path().join("project");
    std::fs::create_dir_all(&project).unwrap();
    if initialized {
        std::fs::create_dir_all(project.join("backlog")).unwrap();
        std::fs::write(project.join("backlog/config.yml"), "project_name: demo\n").unwrap();
    }

    let resolver = ExecutableResolver {
        program: "backlog".to_string(),
        custom_path: Some(exe),
        bundle_root: None,
        windows: false,
        probes: ProbeCommands::for_platform(false),
    };
    let server = BacklogMcpServer::with_runner(CommandRunner::new(resolver, project.clone(), 1));

    Fixture {
        _dir: dir,
        project,
        server,
    }
}

fn text(result: &CallToolResult) -> String {
    result
        .content
        .first()
        .and_then(|c| c.as_text())
        .map(|t| t.text.clone())
        .unwrap_or_default()
}

fn invoked(project: &Path) -> bool {
    project.join(".invoked").exists()
}

// ============================================================================
// Argument handling
// ============================================================================

#[tokio::test]
async fn parentheses_in_text_fields_reach_the_cli_unmodified() {
    let f = fixture(true);
    let result = f
        .server
        .call_tool(
            "task_create",
            json!({ "title": "Edge cases", "description": "fix (edge case) bug" }),
        )
        .await
        .unwrap();

    assert_ne!(result.is_error, Some(true), "{}", text(&result));
    assert_eq!(
        text(&result),
        "task\ncreate\nEdge cases\n--plain\n--description\nfix (edge case) bug"
    );
}

#[tokio::test]
async fn injected_title_is_rejected_before_spawn() {
    let f = fixture(true);
    let result = f
        .server
        .call_tool("task_create", json!({ "title": "; rm -rf /" }))
        .await
        .unwrap();

    assert_eq!(result.is_error, Some(true));
    assert!(text(&result).contains("dangerous shell characters"));
    assert!(!invoked(&f.project));
}

#[tokio::test]
async fn metacharacters_in_notes_are_rejected() {
    let f = fixture(true);
    let result = f
        .server
        .call_tool("task_edit", json!({ "taskId": "task-1", "notes": "a | b" }))
        .await
        .unwrap();

    assert_eq!(result.is_error, Some(true));
    assert!(text(&result).contains("'--notes'"));
    assert!(!invoked(&f.project));
}

#[tokio::test]
async fn uninitialized_project_fails_without_spawning() {
    let f = fixture(false);
    let result = f
        .server
        .call_tool("board_show", json!({}))
        .await
        .unwrap();

    assert_eq!(result.is_error, Some(true));
    assert!(text(&result).contains("backlog init"));
    assert!(!invoked(&f.project));
}

// ============================================================================
// Tool post-processing
// ============================================================================

#[tokio::test]
async fn task_list_filters_by_label() {
    let f = fixture(true);
    let result = f
        .server
        .call_tool("task_list", json!({ "label": "UI" }))
        .await
        .unwrap();

    assert_eq!(text(&result), "To Do:\n  task-1 - Login");
}

#[tokio::test]
async fn task_dependencies_reports_dependency_line() {
    let f = fixture(true);

    let with_deps = f
        .server
        .call_tool("task_dependencies", json!({ "taskId": "task-1" }))
        .await
        .unwrap();
    assert_eq!(text(&with_deps), "**Dependencies:** task-0");

    let without = f
        .server
        .call_tool("task_dependencies", json!({ "taskId": "task-2" }))
        .await
        .unwrap();
    assert_eq!(text(&without), "Task task-2 has no dependencies.");
}

#[tokio::test]
async fn task_children_reports_empty_listing() {
    let f = fixture(true);
    let result = f
        .server
        .call_tool("task_children", json!({ "taskId": "task-1" }))
        .await
        .unwrap();

    assert_eq!(text(&result), "No child tasks found for task-1.");
}

#[tokio::test]
async fn cli_failure_surfaces_stderr() {
    let f = fixture(true);
    let result = f
        .server
        .call_tool("task_view", json!({ "taskId": "task-99" }))
        .await
        .unwrap();

    assert_eq!(result.is_error, Some(true));
    assert_eq!(
        text(&result),
        "Error: Command failed with exit code 1: Task task-99 not found\n"
    );
}

#[tokio::test]
async fn board_export_flags() {
    let f = fixture(true);
    let result = f
        .server
        .call_tool(
            "board_export",
            json!({ "filename": "board.md", "readme": true, "exportVersion": "1.0.0" }),
        )
        .await
        .unwrap();

    assert_eq!(
        text(&result),
        "board\nexport\nboard.md\n--readme\n--export-version\n1.0.0"
    );
}

#[tokio::test]
async fn decision_list_outside_working_directory_is_denied() {
    let f = fixture(true);
    let result = f
        .server
        .call_tool("decision_list", json!({}))
        .await
        .unwrap();

    assert_ne!(result.is_error, Some(true));
    assert!(text(&result).starts_with("Error reading decisions:"));
}

// ============================================================================
// Resources
// ============================================================================

#[tokio::test]
async fn statistics_resource_appends_metrics() {
    let f = fixture(true);
    let result = f
        .server
        .read_backlog_resource("backlog://statistics")
        .await
        .unwrap();

    let json = serde_json::to_value(&result).unwrap();
    let text = json["contents"][0]["text"].as_str().unwrap();
    assert!(text.starts_with("overview\n"));
    assert!(text.contains("## Additional Metrics"));
    assert!(text.contains("Total Tasks Listed: 3"));
    assert!(text.contains("- To Do: 1"));
    assert_eq!(json["contents"][0]["mimeType"], "text/plain");
}

#[tokio::test]
async fn unknown_resource_is_an_error() {
    let f = fixture(true);
    assert!(f
        .server
        .read_backlog_resource("backlog://missing")
        .await
        .is_err());
}

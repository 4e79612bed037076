//! Task-related parameter types

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Heading used when grouping tasks
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Priority,
    Id,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Priority => "priority",
            SortField::Id => "id",
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct TaskCreateParams {
    #[schemars(description = "Task title")]
    pub title: String,
    #[schemars(description = "Task description (optional)")]
    pub description: Option<String>,
    #[schemars(description = "Task status (must match your Backlog.md configuration)")]
    pub status: Option<String>,
    #[schemars(description = "Task priority (optional)")]
    pub priority: Option<Priority>,
    #[schemars(description = "Task labels (optional)")]
    pub labels: Option<Vec<String>>,
    #[schemars(description = "Task assignee (optional)")]
    pub assignee: Option<String>,
    #[schemars(description = "Implementation plan (optional)")]
    pub plan: Option<String>,
    #[schemars(description = "Implementation notes (optional)")]
    pub notes: Option<String>,
    #[schemars(
        description = "Acceptance criteria: specific, verifiable outcomes that define completion, e.g. ['Unit tests pass', 'Documentation updated']"
    )]
    pub ac: Option<Vec<String>>,
    #[schemars(
        description = "Comma-separated IDs of tasks that must complete first, e.g. 'task-1,task-2'"
    )]
    pub dependencies: Option<String>,
    #[schemars(
        description = "Parent task ID; creates this task as a sub-task, e.g. 'task-8' yields task-8.1"
    )]
    pub parent: Option<String>,
    #[schemars(description = "Create as draft task (optional)")]
    pub draft: Option<bool>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct TaskListParams {
    #[schemars(
        description = "Filter by status, or 'all' for every task (values must match your Backlog.md configuration)"
    )]
    pub status: Option<String>,
    #[schemars(description = "Filter by label")]
    pub label: Option<String>,
    #[schemars(description = "Filter by priority")]
    pub priority: Option<Priority>,
    #[schemars(description = "Filter by assignee")]
    pub assignee: Option<String>,
    #[schemars(description = "Filter by parent task ID")]
    pub parent: Option<String>,
    #[schemars(description = "Sort tasks by field")]
    pub sort: Option<SortField>,
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskEditParams {
    #[schemars(description = "Task ID to edit")]
    pub task_id: String,
    #[schemars(description = "New title (optional)")]
    pub title: Option<String>,
    #[schemars(description = "New description (optional)")]
    pub description: Option<String>,
    #[schemars(description = "New status (optional, must match your Backlog.md configuration)")]
    pub status: Option<String>,
    #[schemars(description = "New priority (optional)")]
    pub priority: Option<Priority>,
    #[schemars(description = "Task assignee (optional)")]
    pub assignee: Option<String>,
    #[schemars(description = "Implementation plan (optional)")]
    pub plan: Option<String>,
    #[schemars(description = "Implementation notes (optional)")]
    pub notes: Option<String>,
    #[schemars(description = "Add acceptance criteria (optional)")]
    pub ac: Option<Vec<String>>,
    #[schemars(description = "Remove acceptance criteria by index (optional)")]
    pub remove_ac: Option<Vec<u32>>,
    #[schemars(description = "Mark acceptance criteria as done by index (optional)")]
    pub check_ac: Option<Vec<u32>>,
    #[schemars(description = "Mark acceptance criteria as not done by index (optional)")]
    pub uncheck_ac: Option<Vec<u32>>,
    #[schemars(description = "Comma-separated task dependencies (optional)")]
    pub dependencies: Option<String>,
    #[schemars(description = "Add a single label (optional)")]
    pub add_label: Option<String>,
    #[schemars(description = "Remove a single label (optional)")]
    pub remove_label: Option<String>,
    #[schemars(description = "Set task ordinal for custom ordering (optional)")]
    pub ordinal: Option<u32>,
}

/// Any tool addressing a single task by ID
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskIdParams {
    #[schemars(description = "Task ID, e.g. 'task-12' or 'task-12.1'")]
    pub task_id: String,
}

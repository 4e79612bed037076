//! Draft-related parameter types

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct DraftCreateParams {
    #[schemars(description = "Draft task title")]
    pub title: String,
    #[schemars(description = "Draft task description (optional)")]
    pub description: Option<String>,
    #[schemars(description = "Task assignee (optional)")]
    pub assignee: Option<String>,
    #[schemars(description = "Comma-separated labels (optional)")]
    pub labels: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DraftIdParams {
    #[schemars(description = "Draft task ID")]
    pub task_id: String,
}

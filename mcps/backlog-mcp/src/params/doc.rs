//! Documentation and decision parameter types

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct DocCreateParams {
    #[schemars(description = "Document title")]
    pub title: String,
    #[schemars(description = "Document path (optional, e.g. 'guides/setup')")]
    pub path: Option<String>,
    #[serde(rename = "type")]
    #[schemars(description = "Document type (optional, e.g. 'technical')")]
    pub doc_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocViewParams {
    #[schemars(description = "Document ID to view")]
    pub doc_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DecisionStatus {
    Proposed,
    Accepted,
    Rejected,
    Superseded,
}

impl DecisionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionStatus::Proposed => "proposed",
            DecisionStatus::Accepted => "accepted",
            DecisionStatus::Rejected => "rejected",
            DecisionStatus::Superseded => "superseded",
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct DecisionCreateParams {
    #[schemars(description = "Decision title")]
    pub title: String,
    #[schemars(description = "Decision status (optional)")]
    pub status: Option<DecisionStatus>,
}

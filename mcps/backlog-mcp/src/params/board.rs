//! Board parameter types

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoardExportParams {
    #[schemars(description = "Output filename (optional)")]
    pub filename: Option<String>,
    #[schemars(description = "Overwrite existing file without confirmation")]
    pub force: Option<bool>,
    #[schemars(description = "Export to README.md with markers")]
    pub readme: Option<bool>,
    #[schemars(description = "Version to include in the export")]
    pub export_version: Option<String>,
}

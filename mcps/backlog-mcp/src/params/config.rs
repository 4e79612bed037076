//! Backlog configuration parameter types

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ConfigGetParams {
    #[schemars(description = "Configuration key to get")]
    pub key: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ConfigSetParams {
    #[schemars(description = "Configuration key")]
    pub key: String,
    #[schemars(description = "Configuration value")]
    pub value: String,
}

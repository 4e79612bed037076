//! In-process tool invocation
//!
//! [`EmbeddableMcp`] lets a host (or a test) call a server's tools directly,
//! bypassing the stdio transport. Parameters arrive as JSON exactly as they
//! would in a `tools/call` request.

use async_trait::async_trait;
use rmcp::model::{CallToolResult, Tool};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum EmbeddableError {
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    #[error("invalid parameters: {0}")]
    InvalidParams(#[from] serde_json::Error),

    #[error("mcp error: {0}")]
    McpError(String),
}

impl From<rmcp::ErrorData> for EmbeddableError {
    fn from(err: rmcp::ErrorData) -> Self {
        EmbeddableError::McpError(err.message.to_string())
    }
}

pub type EmbeddableResult<T> = Result<T, EmbeddableError>;

/// A server whose tools can be called without a transport
///
/// Implementations usually delegate `list_tools` to their `ToolRouter` and
/// match on the tool name in `call_tool`, deserializing the JSON parameters
/// into the same types the router uses.
#[async_trait]
pub trait EmbeddableMcp: Send + Sync {
    /// Name used for this server in MCP client configuration
    fn server_name(&self) -> &str;

    fn list_tools(&self) -> Vec<Tool>;

    /// Call a tool by name with a JSON object of parameters
    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult>;

    fn server_description(&self) -> Option<&str> {
        None
    }
}

//! MCP Common - Shared plumbing for MCP servers
//!
//! - **Initialization**: [`init_tracing`] routes logs to stderr so stdout stays
//!   free for the stdio transport
//! - **Results**: helpers for building `CallToolResult` values, including
//!   error-flagged results that keep a failing tool call off the transport
//! - **Errors**: conversions from library errors into `McpError`
//! - **Embeddable**: [`EmbeddableMcp`] for calling tools in-process
//!
//! # Example
//!
//! ```rust,ignore
//! use mcp_common::{text_success, tool_error};
//!
//! match run_something().await {
//!     Ok(stdout) => Ok(text_success(stdout)),
//!     Err(e) => Ok(tool_error(e)),
//! }
//! ```

pub mod embeddable;
pub mod error;
pub mod init;
pub mod result;

pub use embeddable::{EmbeddableError, EmbeddableMcp, EmbeddableResult};
pub use error::{internal_error, resource_not_found, McpResult, ResultExt};
pub use init::{init_tracing, LogLevel};
pub use result::{text_success, tool_error, tool_result};

// Re-export rmcp types that are commonly needed
pub use rmcp::{
    model::{CallToolResult, Content, Tool},
    ErrorData as McpError,
};

pub use async_trait::async_trait;

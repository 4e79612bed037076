//! Backlog.md MCP Library
//!
//! MCP-compatible tools and resources for a Backlog.md project via the
//! `backlog` CLI.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use backlog_mcp::BacklogMcpServer;
//! use mcp_common::EmbeddableMcp;
//!
//! let server = BacklogMcpServer::new();
//! let result = server
//!     .call_tool("task_list", serde_json::json!({ "status": "To Do" }))
//!     .await?;
//! ```
//!
//! # Features
//! - Tasks: create, list (with label filter), edit, view, archive, demote,
//!   dependencies, children
//! - Drafts, documents and decision records
//! - Board view/export, overview, execution sequences
//! - `backlog://` resources, including tasks grouped by priority
//!
//! # Requirements
//! - `backlog` CLI installed (or `backlogCliPath` set in the local config)
//! - `backlog init` run in the project directory

pub mod backlog;
pub mod cli;
pub mod config;
pub mod decisions;
pub mod handlers;
pub mod params;
pub mod resources;
pub mod server;

// Re-export main server type
pub use server::BacklogMcpServer;

// Re-export parameter types for direct API usage
pub use params::*;

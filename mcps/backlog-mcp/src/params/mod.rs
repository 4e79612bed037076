//! Parameter types for backlog MCP tools
//!
//! Organized by domain: task, draft, doc, board, config

mod board;
mod config;
mod doc;
mod draft;
mod task;

pub use board::*;
pub use config::*;
pub use doc::*;
pub use draft::*;
pub use task::*;

//! Handler implementations for backlog MCP tools
//!
//! Organized by domain: task, draft, doc, board, config. Each tool has a
//! pure `*_args` function producing the CLI argument vector and an async
//! handler that runs it.

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

use mcp_common::{tool_result, CallToolResult};

use crate::backlog::{BacklogResult, CommandRunner};

/// Argument vector under construction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Argv(Vec<String>);

impl Argv {
    pub fn new(words: &[&str]) -> Self {
        Self(words.iter().map(|w| w.to_string()).collect())
    }

    pub fn arg(mut self, value: impl Into<String>) -> Self {
        self.0.push(value.into());
        self
    }

    /// `flag value` when the value is present and non-empty
    pub fn opt(mut self, flag: &str, value: Option<&str>) -> Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.0.push(flag.to_string());
            self.0.push(value.to_string());
        }
        self
    }

    /// Bare `flag` when set to true
    pub fn switch(mut self, flag: &str, on: Option<bool>) -> Self {
        if on.unwrap_or(false) {
            self.0.push(flag.to_string());
        }
        self
    }

    /// `flag value` repeated once per element
    pub fn each<T: ToString>(mut self, flag: &str, values: Option<&[T]>) -> Self {
        for value in values.unwrap_or_default() {
            self.0.push(flag.to_string());
            self.0.push(value.to_string());
        }
        self
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<Argv> for Vec<String> {
    fn from(argv: Argv) -> Self {
        argv.0
    }
}

/// CLI output with trailing whitespace removed
pub(crate) fn trimmed(result: BacklogResult<String>) -> BacklogResult<String> {
    result.map(|out| out.trim_end().to_string())
}

/// Run an argument vector and fold the outcome into a tool result
pub(crate) async fn run_tool(runner: &CommandRunner, argv: Argv) -> CallToolResult {
    tool_result(trimmed(runner.run(&argv.into_vec()).await))
}

//! Result helpers for MCP tool responses
//!
//! A tool that wraps an external process reports process failures as tool
//! results with `is_error` set, not as protocol errors. The client sees the
//! message and the connection stays up.

use std::fmt::Display;

use rmcp::model::{CallToolResult, Content};

/// Successful plain text response
pub fn text_success(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

/// Error-flagged response carrying `Error: <message>`
pub fn tool_error(err: impl Display) -> CallToolResult {
    CallToolResult::error(vec![Content::text(format!("Error: {}", err))])
}

/// Fold a `Result` into a tool response
///
/// ```rust,ignore
/// Ok(tool_result(runner.run(&args).await))
/// ```
pub fn tool_result<E: Display>(result: Result<String, E>) -> CallToolResult {
    match result {
        Ok(text) => text_success(text),
        Err(e) => {
            tracing::warn!(error = %e, "tool call failed");
            tool_error(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_text(result: &CallToolResult) -> String {
        result
            .content
            .first()
            .and_then(|c| c.as_text())
            .map(|t| t.text.clone())
            .unwrap_or_default()
    }

    #[test]
    fn test_text_success() {
        let result = text_success("hello world");
        assert!(!result.is_error.unwrap_or(false));
        assert_eq!(first_text(&result), "hello world");
    }

    #[test]
    fn test_tool_error_is_flagged() {
        let result = tool_error("boom");
        assert_eq!(result.is_error, Some(true));
        assert_eq!(first_text(&result), "Error: boom");
    }

    #[test]
    fn test_tool_result_folds_both_arms() {
        let ok: Result<String, String> = Ok("done".into());
        assert!(!tool_result(ok).is_error.unwrap_or(false));

        let err: Result<String, String> = Err("exit code 2".into());
        let result = tool_result(err);
        assert_eq!(result.is_error, Some(true));
        assert!(first_text(&result).contains("exit code 2"));
    }
}

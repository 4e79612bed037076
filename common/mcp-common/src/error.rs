//! Conversions into MCP protocol errors
//!
//! Protocol errors are reserved for requests the server cannot interpret
//! (bad parameters, unknown resources). Failures of the work itself belong
//! in a tool result, see [`crate::result::tool_error`].

use std::fmt::Display;

use rmcp::ErrorData as McpError;

/// Type alias for MCP handler results
pub type McpResult<T> = Result<T, McpError>;

/// Extension trait mapping any displayable error to an internal MCP error
///
/// ```rust,ignore
/// let text = runner.run(&args).await.to_mcp_err()?;
/// ```
pub trait ResultExt<T> {
    fn to_mcp_err(self) -> McpResult<T>;
}

impl<T, E: Display> ResultExt<T> for Result<T, E> {
    fn to_mcp_err(self) -> McpResult<T> {
        self.map_err(|e| internal_error(e.to_string()))
    }
}

pub fn internal_error(message: impl Into<String>) -> McpError {
    McpError::internal_error(message.into(), None)
}

pub fn resource_not_found(uri: &str) -> McpError {
    McpError::resource_not_found(format!("Unknown resource: {}", uri), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_ext() {
        let result: Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "not found"));
        let err = result.to_mcp_err().unwrap_err();
        assert!(err.message.contains("not found"));
    }

    #[test]
    fn test_resource_not_found_names_uri() {
        let err = resource_not_found("backlog://nope");
        assert!(err.message.contains("backlog://nope"));
    }
}

//! Error types for backlog CLI operations

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when executing backlog CLI commands
#[derive(Error, Debug)]
pub enum BacklogError {
    /// An argument failed validation; nothing was spawned
    #[error("{reason}")]
    InvalidArguments { reason: String },

    /// The project directory has no backlog marker file
    #[error(
        "Backlog.md is not initialized in the project directory ({}). Please run \"backlog init\" first.",
        project_dir.display()
    )]
    NotInitialized { project_dir: PathBuf },

    /// The OS could not find the executable at spawn time
    #[error(
        "Backlog CLI not found at: {path}\nPlease ensure backlog.md is installed or configure the path using:\nbacklog-mcp config set backlogCliPath \"/path/to/backlog\""
    )]
    NotFound { path: String },

    /// Failed to spawn or wait on the backlog process
    #[error("Command failed: {0}")]
    Spawn(#[source] std::io::Error),

    /// The backlog command exited with a non-zero status
    #[error("Command failed with exit code {code}: {stderr}")]
    CommandFailed { code: i32, stderr: String },

    /// Filesystem access outside the subprocess path (decision records)
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Requested directory is outside the allowed project roots
    #[error("Access to specified directory is not allowed")]
    AccessDenied,
}

impl BacklogError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        BacklogError::InvalidArguments {
            reason: reason.into(),
        }
    }

    /// Map a spawn-time io error, singling out a missing executable
    pub fn from_spawn(err: std::io::Error, path: &str) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            BacklogError::NotFound {
                path: path.to_string(),
            }
        } else {
            BacklogError::Spawn(err)
        }
    }
}

/// Result type alias for backlog operations
pub type BacklogResult<T> = Result<T, BacklogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_carries_remediation_hint() {
        let err = BacklogError::from_spawn(
            std::io::Error::new(std::io::ErrorKind::NotFound, "nope"),
            "/opt/backlog",
        );
        let msg = err.to_string();
        assert!(msg.contains("/opt/backlog"));
        assert!(msg.contains("config set backlogCliPath"));
    }

    #[test]
    fn test_other_spawn_errors_stay_generic() {
        let err = BacklogError::from_spawn(
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            "backlog",
        );
        assert!(matches!(err, BacklogError::Spawn(_)));
        assert!(err.to_string().starts_with("Command failed:"));
    }

    #[test]
    fn test_command_failed_embeds_stderr() {
        let err = BacklogError::CommandFailed {
            code: 2,
            stderr: "Task not found".into(),
        };
        assert_eq!(
            err.to_string(),
            "Command failed with exit code 2: Task not found"
        );
    }
}

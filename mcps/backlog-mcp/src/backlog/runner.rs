//! Async runner for backlog CLI commands
//!
//! Every call goes through the same pipeline:
//! project marker check, argument validation, executable resolution,
//! a spawn permit, then the process itself. The first two steps fail
//! without spawning anything. The executable is resolved afresh for each
//! call, so installing or moving the CLI takes effect without a restart.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::{debug, error, instrument, warn};

use super::error::{BacklogError, BacklogResult};
use super::invocation::InvocationMode;
use super::resolver::{ExecutableResolver, Resolution};
use super::validate::validate;
use super::version::{extract_version, VersionCompatibility, SUPPORTED_VERSION};

const VERSION_TIMEOUT: Duration = Duration::from_secs(5);

/// Marker files written by `backlog init`, current layout first
const INIT_MARKERS: [&str; 2] = ["backlog/config.yml", ".backlog/config.yml"];

/// Directory the wrapped CLI runs in: `PWD` when set, else the process cwd
pub fn project_dir_from_env() -> PathBuf {
    std::env::var_os("PWD")
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Whether `backlog init` has been run in `dir`
pub fn is_initialized(dir: &Path) -> bool {
    INIT_MARKERS.iter().any(|marker| dir.join(marker).is_file())
}

#[derive(Debug)]
pub struct CommandRunner {
    resolver: ExecutableResolver,
    mode: InvocationMode,
    project_dir: PathBuf,
    permits: Arc<Semaphore>,
}

impl CommandRunner {
    /// Runner for the host platform's invocation mode
    ///
    /// `max_spawns` bounds how many backlog processes may run at once;
    /// waiters are served in arrival order.
    pub fn new(resolver: ExecutableResolver, project_dir: PathBuf, max_spawns: usize) -> Self {
        Self {
            resolver,
            mode: InvocationMode::for_host(),
            project_dir,
            permits: Arc::new(Semaphore::new(max_spawns.max(1))),
        }
    }

    pub fn with_mode(mut self, mode: InvocationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn mode(&self) -> InvocationMode {
        self.mode
    }

    /// Current executable location
    pub async fn executable(&self) -> Resolution {
        self.resolver.resolve().await
    }

    /// Run `backlog <args>` in the project directory and return its stdout
    #[instrument(skip(self), fields(cmd = %args.join(" ")))]
    pub async fn run(&self, args: &[String]) -> BacklogResult<String> {
        if !is_initialized(&self.project_dir) {
            return Err(BacklogError::NotInitialized {
                project_dir: self.project_dir.clone(),
            });
        }

        validate(args).map_err(|rejection| {
            warn!(%rejection, "rejected arguments");
            BacklogError::invalid(rejection.to_string())
        })?;

        let exe = self.executable().await;
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| BacklogError::Spawn(std::io::Error::other(e)))?;

        debug!(path = %exe.path, strategy = %exe.strategy, "executing backlog");

        let output = self
            .mode
            .command(&exe.path, args, &self.project_dir)
            .spawn()
            .map_err(|e| BacklogError::from_spawn(e, &exe.path))?
            .wait_with_output()
            .await
            .map_err(BacklogError::Spawn)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            let code = output.status.code().unwrap_or(-1);
            error!(code, stderr = %stderr, "backlog command failed");
            return Err(BacklogError::CommandFailed { code, stderr });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Installed CLI version from `backlog --version`, if it can be read
    #[instrument(skip(self))]
    pub async fn version(&self) -> Option<String> {
        let exe = self.executable().await;
        let args = ["--version"];
        let mut cmd = self.mode.command(&exe.path, &args, &self.project_dir);
        cmd.kill_on_drop(true);

        match tokio::time::timeout(VERSION_TIMEOUT, cmd.output()).await {
            Ok(Ok(output)) if output.status.success() => {
                extract_version(&String::from_utf8_lossy(&output.stdout))
            }
            Ok(Ok(output)) => {
                debug!(status = %output.status, "--version exited unsuccessfully");
                None
            }
            Ok(Err(e)) => {
                debug!(error = %e, "could not spawn backlog for --version");
                None
            }
            Err(_) => {
                warn!("backlog --version timed out");
                None
            }
        }
    }

    pub async fn check_version_compatibility(&self) -> VersionCompatibility {
        let installed = self.version().await;
        VersionCompatibility::check(installed.as_deref(), SUPPORTED_VERSION)
    }
}

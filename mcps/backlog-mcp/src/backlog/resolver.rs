//! Locating the backlog executable
//!
//! Resolution walks a fixed list of [`Strategy`] values and takes the first
//! hit. Each strategy yields an optional path; a failing probe (missing
//! tool, timeout, sandbox without a shell) is a miss, never an error. When
//! everything misses, the bare program name is returned and PATH lookup
//! happens at spawn time.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, instrument, warn};

const PATH_LOOKUP_TIMEOUT: Duration = Duration::from_secs(2);
const NPM_ROOT_TIMEOUT: Duration = Duration::from_secs(3);

/// Where a resolved path came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Configured,
    SystemPath,
    NpmGlobal,
    WindowsCommon,
    Bundled,
    Fallback,
}

impl Strategy {
    /// Probing order; [`Strategy::Fallback`] is implied after the last entry
    pub const ORDER: [Strategy; 5] = [
        Strategy::Configured,
        Strategy::SystemPath,
        Strategy::NpmGlobal,
        Strategy::WindowsCommon,
        Strategy::Bundled,
    ];
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Configured => "configured backlogCliPath",
            Strategy::SystemPath => "system PATH lookup",
            Strategy::NpmGlobal => "npm global install",
            Strategy::WindowsCommon => "common Windows location",
            Strategy::Bundled => "bundled node_modules",
            Strategy::Fallback => "bare command name",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub path: String,
    pub strategy: Strategy,
}

/// External commands the PATH and npm strategies run, with their time limits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeCommands {
    /// `which` / `where`
    pub finder: String,
    pub npm: String,
    pub finder_timeout: Duration,
    pub npm_timeout: Duration,
}

impl ProbeCommands {
    pub fn for_platform(windows: bool) -> Self {
        let (finder, npm) = if windows {
            ("where", "npm.cmd")
        } else {
            ("which", "npm")
        };
        Self {
            finder: finder.to_string(),
            npm: npm.to_string(),
            finder_timeout: PATH_LOOKUP_TIMEOUT,
            npm_timeout: NPM_ROOT_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExecutableResolver {
    /// Command name without extension
    pub program: String,
    /// `backlogCliPath` from the local config
    pub custom_path: Option<PathBuf>,
    /// Directory whose `node_modules/.bin` may hold a bundled copy
    pub bundle_root: Option<PathBuf>,
    pub windows: bool,
    pub probes: ProbeCommands,
}

impl ExecutableResolver {
    pub fn new(custom_path: Option<PathBuf>) -> Self {
        let bundle_root = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().and_then(Path::parent).map(Path::to_path_buf));

        Self {
            program: "backlog".to_string(),
            custom_path,
            bundle_root,
            windows: cfg!(windows),
            probes: ProbeCommands::for_platform(cfg!(windows)),
        }
    }

    /// Resolve the executable; always yields something spawnable by name
    #[instrument(skip(self), fields(program = %self.program))]
    pub async fn resolve(&self) -> Resolution {
        for strategy in Strategy::ORDER {
            if let Some(path) = self.probe(strategy).await {
                debug!(%strategy, path = %path.display(), "resolved backlog executable");
                return Resolution {
                    path: path.to_string_lossy().into_owned(),
                    strategy,
                };
            }
        }

        let path = self.fallback_name();
        debug!(%path, "no backlog executable found, relying on PATH at spawn time");
        Resolution {
            path,
            strategy: Strategy::Fallback,
        }
    }

    /// Run a single strategy
    pub async fn probe(&self, strategy: Strategy) -> Option<PathBuf> {
        match strategy {
            Strategy::Configured => self.configured(),
            Strategy::SystemPath => self.system_path().await,
            Strategy::NpmGlobal => self.npm_global().await,
            Strategy::WindowsCommon if self.windows => first_existing(windows_common_candidates(
                &self.program,
                std::env::var_os("APPDATA").map(PathBuf::from),
                std::env::var_os("PROGRAMFILES").map(PathBuf::from),
            )),
            Strategy::WindowsCommon => None,
            Strategy::Bundled => self.bundle_root.as_deref().and_then(|root| {
                first_existing(bin_candidates(&root.join("node_modules"), &self.program, self.windows))
            }),
            Strategy::Fallback => Some(PathBuf::from(self.fallback_name())),
        }
    }

    pub fn fallback_name(&self) -> String {
        if self.windows {
            format!("{}.cmd", self.program)
        } else {
            self.program.clone()
        }
    }

    fn configured(&self) -> Option<PathBuf> {
        let path = self.custom_path.as_ref()?;
        if path.exists() {
            return Some(path.clone());
        }
        warn!(
            path = %path.display(),
            "configured backlog CLI path does not exist, attempting to auto-detect"
        );
        None
    }

    async fn system_path(&self) -> Option<PathBuf> {
        let stdout = capture(
            &self.probes.finder,
            &[self.program.as_str()],
            self.probes.finder_timeout,
        )
        .await?;

        let first = stdout.lines().next()?.trim();
        let path = PathBuf::from(first);
        (!first.is_empty() && path.is_file()).then_some(path)
    }

    async fn npm_global(&self) -> Option<PathBuf> {
        let stdout = capture(&self.probes.npm, &["root", "-g"], self.probes.npm_timeout).await?;

        let root = PathBuf::from(stdout.trim());
        let mut candidates = bin_candidates(&root, &self.program, self.windows);
        if self.windows {
            // npm on Windows puts shims next to node_modules, not in .bin
            if let Some(prefix) = root.parent() {
                candidates.push(prefix.join(format!("{}.cmd", self.program)));
                candidates.push(prefix.join(format!("{}.exe", self.program)));
            }
        }
        first_existing(candidates)
    }
}

/// `<node_modules>/.bin/<program>` variants for the platform
pub fn bin_candidates(node_modules: &Path, program: &str, windows: bool) -> Vec<PathBuf> {
    let bin = node_modules.join(".bin");
    if windows {
        vec![
            bin.join(format!("{}.cmd", program)),
            bin.join(format!("{}.exe", program)),
        ]
    } else {
        vec![bin.join(program)]
    }
}

/// Usual Windows install directories, `.cmd` first
pub fn windows_common_candidates(
    program: &str,
    appdata: Option<PathBuf>,
    program_files: Option<PathBuf>,
) -> Vec<PathBuf> {
    let names = [
        format!("{}.cmd", program),
        format!("{}.exe", program),
        program.to_string(),
    ];

    let mut dirs = Vec::new();
    if let Some(appdata) = appdata {
        dirs.push(appdata.join("npm"));
    }
    if let Some(program_files) = program_files {
        dirs.push(program_files.join("nodejs"));
    }
    dirs.push(PathBuf::from(r"C:\Program Files\nodejs"));

    dirs.iter()
        .flat_map(|dir| names.iter().map(move |name| dir.join(name)))
        .collect()
}

fn first_existing(candidates: Vec<PathBuf>) -> Option<PathBuf> {
    candidates.into_iter().find(|p| p.exists())
}

/// Run a short probe command and return its stdout on success
///
/// stderr is discarded. The child is killed if it outlives `limit`.
async fn capture(program: &str, args: &[&str], limit: Duration) -> Option<String> {
    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .output();

    match tokio::time::timeout(limit, child).await {
        Ok(Ok(output)) if output.status.success() => {
            Some(String::from_utf8_lossy(&output.stdout).into_owned())
        }
        Ok(Ok(_)) | Ok(Err(_)) => None,
        Err(_) => {
            debug!(program, ?limit, "probe timed out");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn resolver(custom_path: Option<PathBuf>, bundle_root: Option<PathBuf>) -> ExecutableResolver {
        ExecutableResolver {
            program: "backlog-resolver-test-missing".to_string(),
            custom_path,
            bundle_root,
            windows: false,
            probes: ProbeCommands::for_platform(false),
        }
    }

    fn bundled_binary(root: &Path, program: &str) -> PathBuf {
        let bin = root.join("node_modules").join(".bin");
        std::fs::create_dir_all(&bin).unwrap();
        let path = bin.join(program);
        std::fs::write(&path, "#!/bin/sh\n").unwrap();
        path
    }

    #[tokio::test]
    async fn test_existing_configured_path_wins() {
        let dir = TempDir::new().unwrap();
        let custom = dir.path().join("my-backlog");
        std::fs::write(&custom, "").unwrap();
        bundled_binary(dir.path(), "backlog-resolver-test-missing");

        let resolution = resolver(Some(custom.clone()), Some(dir.path().to_path_buf()))
            .resolve()
            .await;
        assert_eq!(resolution.strategy, Strategy::Configured);
        assert_eq!(resolution.path, custom.to_string_lossy());
    }

    #[tokio::test]
    async fn test_missing_configured_path_falls_through() {
        let dir = TempDir::new().unwrap();
        let bundled = bundled_binary(dir.path(), "backlog-resolver-test-missing");

        let resolution = resolver(
            Some(dir.path().join("does-not-exist")),
            Some(dir.path().to_path_buf()),
        )
        .resolve()
        .await;
        assert_eq!(resolution.strategy, Strategy::Bundled);
        assert_eq!(resolution.path, bundled.to_string_lossy());
    }

    #[tokio::test]
    async fn test_falls_back_to_bare_name() {
        let resolution = resolver(None, None).resolve().await;
        assert_eq!(resolution.strategy, Strategy::Fallback);
        assert_eq!(resolution.path, "backlog-resolver-test-missing");
    }

    #[test]
    fn test_fallback_name_on_windows() {
        let mut r = resolver(None, None);
        r.windows = true;
        assert_eq!(r.fallback_name(), "backlog-resolver-test-missing.cmd");
    }

    #[tokio::test]
    async fn test_windows_strategy_skipped_elsewhere() {
        let r = resolver(None, None);
        assert!(r.probe(Strategy::WindowsCommon).await.is_none());
    }

    #[cfg(unix)]
    mod probes {
        use super::*;
        use std::os::unix::fs::PermissionsExt;
        use std::time::Instant;

        fn script(dir: &Path, name: &str, body: &str) -> String {
            let path = dir.join(name);
            std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path.to_string_lossy().into_owned()
        }

        fn with_finder(dir: &Path, body: &str) -> ExecutableResolver {
            let mut r = resolver(None, None);
            r.probes.finder = script(dir, "fake-which", body);
            r.probes.finder_timeout = Duration::from_millis(200);
            r
        }

        fn with_npm(dir: &Path, body: &str) -> ExecutableResolver {
            let mut r = resolver(None, None);
            r.probes.npm = script(dir, "fake-npm", body);
            r.probes.npm_timeout = Duration::from_millis(200);
            r
        }

        #[tokio::test]
        async fn test_system_path_takes_first_line() {
            let dir = TempDir::new().unwrap();
            let exe = dir.path().join("found-backlog");
            std::fs::write(&exe, "").unwrap();
            let r = with_finder(
                dir.path(),
                &format!("echo '{}'\necho /second/match", exe.display()),
            );

            assert_eq!(r.probe(Strategy::SystemPath).await, Some(exe.clone()));
            let resolution = r.resolve().await;
            assert_eq!(resolution.strategy, Strategy::SystemPath);
            assert_eq!(resolution.path, exe.to_string_lossy());
        }

        #[tokio::test]
        async fn test_system_path_ignores_missing_file() {
            let dir = TempDir::new().unwrap();
            let r = with_finder(dir.path(), "echo /no/such/backlog");
            assert!(r.probe(Strategy::SystemPath).await.is_none());
        }

        #[tokio::test]
        async fn test_system_path_ignores_failed_lookup() {
            let dir = TempDir::new().unwrap();
            let exe = dir.path().join("found-backlog");
            std::fs::write(&exe, "").unwrap();
            let r = with_finder(dir.path(), &format!("echo '{}'\nexit 1", exe.display()));
            assert!(r.probe(Strategy::SystemPath).await.is_none());
        }

        #[tokio::test]
        async fn test_system_path_times_out() {
            let dir = TempDir::new().unwrap();
            let exe = dir.path().join("found-backlog");
            std::fs::write(&exe, "").unwrap();
            let r = with_finder(dir.path(), &format!("sleep 5\necho '{}'", exe.display()));

            let started = Instant::now();
            assert!(r.probe(Strategy::SystemPath).await.is_none());
            assert!(started.elapsed() < Duration::from_secs(4));
        }

        #[tokio::test]
        async fn test_npm_global_finds_bin_entry() {
            let dir = TempDir::new().unwrap();
            let root = dir.path().join("lib").join("node_modules");
            let bin = root.join(".bin");
            std::fs::create_dir_all(&bin).unwrap();
            let exe = bin.join("backlog-resolver-test-missing");
            std::fs::write(&exe, "").unwrap();

            let r = with_npm(dir.path(), &format!("echo '{}'", root.display()));
            assert_eq!(r.probe(Strategy::NpmGlobal).await, Some(exe));
        }

        #[tokio::test]
        async fn test_npm_global_without_candidate() {
            let dir = TempDir::new().unwrap();
            let root = dir.path().join("empty_modules");
            std::fs::create_dir_all(&root).unwrap();

            let r = with_npm(dir.path(), &format!("echo '{}'", root.display()));
            assert!(r.probe(Strategy::NpmGlobal).await.is_none());
        }

        #[tokio::test]
        async fn test_npm_global_times_out() {
            let dir = TempDir::new().unwrap();
            let r = with_npm(dir.path(), "sleep 5\necho /usr/lib/node_modules");

            let started = Instant::now();
            assert!(r.probe(Strategy::NpmGlobal).await.is_none());
            assert!(started.elapsed() < Duration::from_secs(4));
        }

        #[tokio::test]
        async fn test_missing_probe_commands_are_misses() {
            let mut r = resolver(None, None);
            r.probes.finder = "/nonexistent/which".to_string();
            r.probes.npm = "/nonexistent/npm".to_string();
            assert!(r.probe(Strategy::SystemPath).await.is_none());
            assert!(r.probe(Strategy::NpmGlobal).await.is_none());
        }
    }

    #[test]
    fn test_bin_candidates() {
        let root = Path::new("/usr/lib/node_modules");
        assert_eq!(
            bin_candidates(root, "backlog", false),
            vec![PathBuf::from("/usr/lib/node_modules/.bin/backlog")]
        );
        assert_eq!(bin_candidates(root, "backlog", true).len(), 2);
    }

    #[test]
    fn test_windows_common_candidates_order() {
        let candidates = windows_common_candidates(
            "backlog",
            Some(PathBuf::from("appdata")),
            Some(PathBuf::from("pf")),
        );
        assert_eq!(candidates.len(), 9);
        assert_eq!(candidates[0], Path::new("appdata").join("npm").join("backlog.cmd"));
        assert_eq!(candidates[3], Path::new("pf").join("nodejs").join("backlog.cmd"));

        let without_env = windows_common_candidates("backlog", None, None);
        assert_eq!(without_env.len(), 3);
    }
}

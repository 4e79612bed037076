//! Decision records read straight from `backlog/decisions`
//!
//! The backlog CLI has no plain listing for decisions, so the files are
//! parsed here. Only the project directory (or something beneath the
//! server's working directory) may be read.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use crate::backlog::{BacklogError, BacklogResult};

static UNSAFE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(/etc|\\\\|file:)").expect("prefix pattern is valid"));
static DECISION_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"decision-(.+?) -").expect("id pattern is valid"));
static DECISION_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"decision-.+? - (.+)\.md$").expect("title pattern is valid"));

/// Strip parent-directory segments and a leading `/etc`, UNC or `file:` prefix
pub fn sanitize_path(path: &str) -> String {
    let path = path.replace("..", "");
    UNSAFE_PREFIX.replace(&path, "").into_owned()
}

/// Whether `path` lies under one of `allowed`
pub fn is_path_allowed(path: &Path, allowed: &[PathBuf]) -> bool {
    let normalized = PathBuf::from(path.to_string_lossy().replace('\\', "/"));
    allowed.iter().any(|dir| normalized.starts_with(dir))
}

/// Roots a decision listing may read from: the working directory and `PWD`
pub fn allowed_roots() -> Vec<PathBuf> {
    let mut roots: Vec<PathBuf> = std::env::current_dir().into_iter().collect();
    if let Some(pwd) = std::env::var_os("PWD").filter(|p| !p.is_empty()) {
        roots.push(PathBuf::from(pwd));
    }
    roots
}

/// One parsed decision file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionSummary {
    pub id: String,
    pub title: String,
    pub status: String,
}

impl DecisionSummary {
    /// Parse id and title from `decision-<id> - <title>.md`, status from the body
    pub fn parse(file_name: &str, content: &str) -> Self {
        let id = DECISION_ID
            .captures(file_name)
            .map(|c| c[1].to_string())
            .unwrap_or_else(|| file_name.replacen(".md", "", 1));

        let title = DECISION_TITLE
            .captures(file_name)
            .map(|c| c[1].replace('-', " "))
            .unwrap_or_else(|| "Unknown".to_string());

        let status = content
            .lines()
            .find(|line| line.to_lowercase().contains("status:"))
            .and_then(|line| line.split(':').nth(1))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("Unknown")
            .to_string();

        Self { id, title, status }
    }

    pub fn render(&self) -> String {
        format!("**{}** - {} [{}]", self.id, self.title, self.status)
    }
}

fn is_decision_file(name: &str) -> bool {
    name.ends_with(".md") && name != "readme.md" && name.starts_with("decision-")
}

/// Markdown listing of the decision records under `project_dir`
#[instrument(skip(allowed))]
pub async fn list_decisions(project_dir: &Path, allowed: &[PathBuf]) -> BacklogResult<String> {
    let sanitized = PathBuf::from(sanitize_path(&project_dir.to_string_lossy()));
    if !is_path_allowed(&sanitized, allowed) {
        return Err(BacklogError::AccessDenied);
    }

    let dir = sanitized.join("backlog").join("decisions");
    let mut entries = tokio::fs::read_dir(&dir)
        .await
        .map_err(|source| BacklogError::Io {
            context: format!("cannot read {}", dir.display()),
            source,
        })?;

    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(|source| BacklogError::Io {
        context: format!("cannot read {}", dir.display()),
        source,
    })? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_decision_file(&name) {
            names.push(name);
        }
    }

    if names.is_empty() {
        return Ok("No decision records found.".to_string());
    }
    names.sort();
    debug!(count = names.len(), "reading decision records");

    let mut lines = Vec::with_capacity(names.len());
    for name in names {
        let line = match tokio::fs::read_to_string(dir.join(&name)).await {
            Ok(content) => DecisionSummary::parse(&name, &content).render(),
            Err(_) => format!("**{}** - Failed to read", name),
        };
        lines.push(line);
    }
    Ok(lines.join("\n"))
}

/// [`list_decisions`] with failures folded into the text
pub async fn render_decisions(project_dir: &Path) -> String {
    list_decisions(project_dir, &allowed_roots())
        .await
        .unwrap_or_else(|e| format!("Error reading decisions: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project_with(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        let decisions = dir.path().join("backlog").join("decisions");
        std::fs::create_dir_all(&decisions).unwrap();
        for (name, body) in files {
            std::fs::write(decisions.join(name), body).unwrap();
        }
        dir
    }

    #[test]
    fn test_sanitize_path() {
        assert_eq!(sanitize_path("/home/u/../proj"), "/home/u//proj");
        assert_eq!(sanitize_path("/etc/passwd"), "/passwd");
        assert_eq!(sanitize_path("FILE:/tmp/x"), "/tmp/x");
        assert_eq!(sanitize_path(r"\\server\share"), r"server\share");
        assert_eq!(sanitize_path("/srv/etc/app"), "/srv/etc/app");
    }

    #[test]
    fn test_is_path_allowed() {
        let allowed = vec![PathBuf::from("/work/project")];
        assert!(is_path_allowed(Path::new("/work/project"), &allowed));
        assert!(is_path_allowed(Path::new("/work/project/sub"), &allowed));
        assert!(!is_path_allowed(Path::new("/work/project-other"), &allowed));
        assert!(!is_path_allowed(Path::new("/tmp"), &allowed));
    }

    #[test]
    fn test_parse_decision_file() {
        let summary = DecisionSummary::parse(
            "decision-3 - use-sqlite-for-cache.md",
            "---\nid: decision-3\nStatus: accepted\n---\n",
        );
        assert_eq!(summary.id, "3");
        assert_eq!(summary.title, "use sqlite for cache");
        assert_eq!(summary.status, "accepted");
        assert_eq!(summary.render(), "**3** - use sqlite for cache [accepted]");
    }

    #[test]
    fn test_parse_falls_back_to_unknown() {
        let summary = DecisionSummary::parse("decision-7.md", "no front matter\n");
        assert_eq!(summary.id, "decision-7");
        assert_eq!(summary.title, "Unknown");
        assert_eq!(summary.status, "Unknown");

        let empty_status = DecisionSummary::parse("decision-1 - a.md", "status:\n");
        assert_eq!(empty_status.status, "Unknown");
    }

    #[tokio::test]
    async fn test_list_decisions_filters_and_sorts() {
        let dir = project_with(&[
            ("decision-2 - second-one.md", "status: proposed\n"),
            ("decision-1 - first.md", "status: accepted\n"),
            ("readme.md", "status: ignored\n"),
            ("notes.md", "status: ignored\n"),
        ]);
        let allowed = vec![dir.path().to_path_buf()];

        let listing = list_decisions(dir.path(), &allowed).await.unwrap();
        assert_eq!(
            listing,
            "**1** - first [accepted]\n**2** - second one [proposed]"
        );
    }

    #[tokio::test]
    async fn test_empty_directory() {
        let dir = project_with(&[("readme.md", "")]);
        let allowed = vec![dir.path().to_path_buf()];
        assert_eq!(
            list_decisions(dir.path(), &allowed).await.unwrap(),
            "No decision records found."
        );
    }

    #[tokio::test]
    async fn test_outside_allowed_roots_is_denied() {
        let dir = project_with(&[]);
        let allowed = vec![PathBuf::from("/definitely/elsewhere")];
        let err = list_decisions(dir.path(), &allowed).await.unwrap_err();
        assert!(matches!(err, BacklogError::AccessDenied));
    }

    #[tokio::test]
    async fn test_missing_directory_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let allowed = vec![dir.path().to_path_buf()];
        let err = list_decisions(dir.path(), &allowed).await.unwrap_err();
        assert!(matches!(err, BacklogError::Io { .. }));
    }
}

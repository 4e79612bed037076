//! Version comparison against the backlog release this server targets

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Backlog.md release the tool catalog was written against
///
/// Override at build time with `BACKLOG_SUPPORTED_VERSION`.
pub const SUPPORTED_VERSION: &str = match option_env!("BACKLOG_SUPPORTED_VERSION") {
    Some(v) => v,
    None => "1.14.0",
};

static SEMVER_CORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\d+\.\d+").expect("version pattern is valid"));

/// First `X.Y.Z` in the output of `backlog --version`
pub fn extract_version(output: &str) -> Option<String> {
    SEMVER_CORE.find(output).map(|m| m.as_str().to_string())
}

/// Component-wise numeric comparison; missing trailing components count as 0
///
/// Non-numeric components also count as 0.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let parse = |v: &str| -> Vec<u64> {
        v.trim()
            .split('.')
            .map(|part| part.parse().unwrap_or(0))
            .collect()
    };
    let (a, b) = (parse(a), parse(b));

    for i in 0..a.len().max(b.len()) {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        match x.cmp(&y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

/// Installed version checked against [`SUPPORTED_VERSION`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionCompatibility {
    pub installed_version: Option<String>,
    pub supported_version: String,
    pub is_compatible: bool,
    pub is_newer: bool,
}

impl VersionCompatibility {
    /// Unknown versions are incompatible; older ones are accepted; newer
    /// ones are accepted but flagged.
    pub fn check(installed: Option<&str>, supported: &str) -> Self {
        let (is_compatible, is_newer) = match installed {
            None => (false, false),
            Some(v) => (true, compare_versions(v, supported) == Ordering::Greater),
        };

        Self {
            installed_version: installed.map(str::to_string),
            supported_version: supported.to_string(),
            is_compatible,
            is_newer,
        }
    }

    pub fn summary(&self) -> String {
        match (&self.installed_version, self.is_newer) {
            (None, _) => format!(
                "Could not determine the installed backlog version (supported: {})",
                self.supported_version
            ),
            (Some(v), true) => format!(
                "backlog {} is newer than the supported {}; some commands may behave differently",
                v, self.supported_version
            ),
            (Some(v), false) => format!(
                "backlog {} is compatible (supported: {})",
                v, self.supported_version
            ),
        }
    }
}

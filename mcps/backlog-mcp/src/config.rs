//! Local server configuration
//!
//! A JSON object stored at `<dir>/config.json`. The directory is, in order:
//! 1. `BACKLOG_CONFIG_DIR`
//! 2. `~/.backlog-mcp-dev` when `BACKLOG_ENV=development`
//! 3. `~/.backlog-mcp`
//!
//! Unknown keys survive a rewrite. Writes replace the file via rename, so
//! readers never observe a half-written file; concurrent writers race and
//! the last one wins.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

const CONFIG_FILE: &str = "config.json";
const CLI_PATH_KEY: &str = "backlogCliPath";
const MAX_SPAWNS_KEY: &str = "maxConcurrentSpawns";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine home directory for configuration")]
    NoHomeDir,

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration key: {0}")]
    InvalidKey(String),
}

/// Keys that must never be written into or read from a config object
pub fn is_valid_config_key(key: &str) -> bool {
    const BLOCKED: [&str; 3] = ["__proto__", "constructor", "prototype"];
    !key.is_empty() && !BLOCKED.iter().any(|b| key.contains(b))
}

/// Typed view of the keys this server reads
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalConfig {
    /// Explicit path to the backlog executable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backlog_cli_path: Option<String>,

    /// Upper bound on simultaneously running backlog processes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrent_spawns: Option<usize>,
}

impl LocalConfig {
    pub fn max_concurrent_spawns(&self) -> usize {
        self.max_concurrent_spawns.unwrap_or(1).max(1)
    }
}

/// Resolve the config directory from explicit inputs
pub fn config_dir_from(
    override_dir: Option<String>,
    backlog_env: Option<String>,
    home: Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(dir) = override_dir.filter(|d| !d.is_empty()) {
        return Some(PathBuf::from(dir));
    }
    let base = if backlog_env.as_deref() == Some("development") {
        ".backlog-mcp-dev"
    } else {
        ".backlog-mcp"
    };
    home.map(|h| h.join(base))
}

#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store located through `BACKLOG_CONFIG_DIR` / `BACKLOG_ENV` / home
    pub fn from_env() -> Result<Self, ConfigError> {
        config_dir_from(
            std::env::var("BACKLOG_CONFIG_DIR").ok(),
            std::env::var("BACKLOG_ENV").ok(),
            dirs::home_dir(),
        )
        .map(Self::new)
        .ok_or(ConfigError::NoHomeDir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    /// Whole config object; missing or unreadable files read as empty
    pub fn load(&self) -> Map<String, Value> {
        let path = self.path();
        let Ok(content) = std::fs::read_to_string(&path) else {
            return Map::new();
        };
        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                tracing::warn!(path = %path.display(), "ignoring malformed config file");
                Map::new()
            }
        }
    }

    /// Keys this server reads, each taken on its own
    ///
    /// A key with the wrong type is ignored with a warning; the others still
    /// apply.
    pub fn settings(&self) -> LocalConfig {
        let config = self.load();

        let backlog_cli_path = match config.get(CLI_PATH_KEY) {
            None | Some(Value::Null) => None,
            Some(Value::String(path)) if !path.is_empty() => Some(path.clone()),
            Some(other) => {
                tracing::warn!(
                    key = CLI_PATH_KEY,
                    value = %other,
                    "ignoring config value, expected a path"
                );
                None
            }
        };

        let max_concurrent_spawns = match config.get(MAX_SPAWNS_KEY) {
            None | Some(Value::Null) => None,
            Some(value) => match value.as_u64().and_then(|n| usize::try_from(n).ok()) {
                Some(n) => Some(n),
                None => {
                    tracing::warn!(
                        key = MAX_SPAWNS_KEY,
                        %value,
                        "ignoring config value, expected a positive integer"
                    );
                    None
                }
            },
        };

        LocalConfig {
            backlog_cli_path,
            max_concurrent_spawns,
        }
    }

    pub fn save(&self, config: &Map<String, Value>) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| ConfigError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.path();
        let tmp = self.dir.join(format!("{}.tmp", CONFIG_FILE));
        let body = serde_json::to_string_pretty(config)?;

        std::fs::write(&tmp, body).map_err(|source| ConfigError::Io {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &path).map_err(|source| ConfigError::Io { path, source })
    }

    pub fn get(&self, key: &str) -> Result<Option<Value>, ConfigError> {
        if !is_valid_config_key(key) {
            return Err(ConfigError::InvalidKey(key.to_string()));
        }
        Ok(self.load().remove(key))
    }

    pub fn set(&self, key: &str, value: Value) -> Result<(), ConfigError> {
        if !is_valid_config_key(key) {
            return Err(ConfigError::InvalidKey(key.to_string()));
        }
        let mut config = self.load();
        config.insert(key.to_string(), value);
        self.save(&config)
    }
}

/// Interpret a value typed on the command line
///
/// Non-negative integers become JSON numbers, everything else a string.
pub fn parse_cli_value(raw: &str) -> Value {
    raw.parse::<u64>()
        .map(Value::from)
        .unwrap_or_else(|_| Value::String(raw.to_string()))
}

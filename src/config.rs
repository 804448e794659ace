//! Runtime configuration.
//!
//! Layered: built-in defaults, then an optional JSON file, then overrides
//! from `TALKDB_*` environment variables / CLI flags. The API key is never
//! stored here; it is read from the provider's environment variable when the
//! client is built. A `.env` file, if present, feeds that environment.

use crate::llm::{LlmClient, DEFAULT_MODEL};
use crate::logging::LogFormat;
use crate::storage::{QueryExecutor, StatementGuard};
use crate::types::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default database file, relative to the working directory.
pub const DEFAULT_DATABASE: &str = "student.db";

/// Default bind address for the web form.
pub const DEFAULT_BIND: &str = "127.0.0.1:8501";

/// Resolved settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite file questions are answered from (`~` and `$VARS` expanded)
    pub database: PathBuf,

    /// Completion model; also selects the provider
    pub model: String,

    /// Override for the provider's API root
    pub base_url: Option<String>,

    /// Refuse anything but a single SELECT
    pub read_only: bool,

    /// Address the web form listens on
    pub bind: String,

    /// Base log level (RUST_LOG wins)
    pub log_level: String,

    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE),
            model: DEFAULT_MODEL.to_string(),
            base_url: None,
            read_only: false,
            bind: DEFAULT_BIND.to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
        }
    }
}

/// Values that replace whatever the file said, when present.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub database: Option<PathBuf>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub read_only: bool,
    pub bind: Option<String>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

/// Load `KEY=value` pairs from a `.env` file into the process environment.
///
/// Variables that are already set keep their value. With no `path`, `.env` is
/// looked up from the current directory upwards.
///
/// # Returns
///
/// The file that was read, or `None` when there was none (or it was unreadable)
pub fn load_env_file(path: Option<&Path>) -> Option<PathBuf> {
    match path {
        Some(path) => dotenvy::from_path(path).ok().map(|_| path.to_path_buf()),
        None => dotenvy::dotenv().ok(),
    }
}

impl Config {
    /// Load configuration from a JSON file.
    ///
    /// Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!("cannot read config {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content)
            .map_err(|e| Error::config(format!("invalid config {}: {}", path.display(), e)))
    }

    /// Load from `path` if given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Apply CLI/env overrides on top of this config.
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(database) = overrides.database {
            self.database = database;
        }
        if let Some(model) = overrides.model {
            self.model = model;
        }
        if overrides.base_url.is_some() {
            self.base_url = overrides.base_url;
        }
        // A flag can only switch read-only on.
        self.read_only |= overrides.read_only;
        if let Some(bind) = overrides.bind {
            self.bind = bind;
        }
        if let Some(level) = overrides.log_level {
            self.log_level = level;
        }
        if let Some(format) = overrides.log_format {
            self.log_format = format;
        }
        self
    }

    /// Database path with `~` and environment variables expanded.
    pub fn database_path(&self) -> Result<PathBuf> {
        let raw = self.database.to_string_lossy();
        let expanded = shellexpand::full(&raw)
            .map_err(|e| Error::config(format!("cannot expand database path '{}': {}", raw, e)))?;
        Ok(PathBuf::from(expanded.as_ref()))
    }

    pub fn guard(&self) -> StatementGuard {
        StatementGuard::from_read_only(self.read_only)
    }

    /// Executor for the configured database.
    pub fn executor(&self) -> Result<QueryExecutor> {
        Ok(QueryExecutor::new(self.database_path()?).with_guard(self.guard()))
    }

    /// Completion client for the configured model, key from the environment.
    pub fn llm_client(&self) -> Result<LlmClient> {
        let client = LlmClient::from_env(&self.model)?;
        Ok(match &self.base_url {
            Some(url) => client.with_base_url(url.clone()),
            None => client,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.database, PathBuf::from("student.db"));
        assert_eq!(config.model, "llama-3.1-8b-instant");
        assert_eq!(config.bind, "127.0.0.1:8501");
        assert!(!config.read_only);
        assert_eq!(config.guard(), StatementGuard::Unchecked);
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("talkdb.json");
        fs::write(&path, r#"{"database": "/data/school.db", "read_only": true}"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.database, PathBuf::from("/data/school.db"));
        assert!(config.read_only);
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            Config::load(&dir.path().join("absent.json")),
            Err(Error::Config(_))
        ));

        let path = dir.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(Config::load(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_overrides_win() {
        let config = Config::default().with_overrides(Overrides {
            database: Some(PathBuf::from("other.db")),
            model: Some("gpt-4o-mini".into()),
            read_only: true,
            log_format: Some(LogFormat::Json),
            ..Default::default()
        });

        assert_eq!(config.database, PathBuf::from("other.db"));
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.guard(), StatementGuard::ReadOnly);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.bind, DEFAULT_BIND);
    }

    #[test]
    fn test_read_only_flag_does_not_unset_file_value() {
        let config = Config {
            read_only: true,
            ..Config::default()
        }
        .with_overrides(Overrides::default());
        assert!(config.read_only);
    }

    #[test]
    fn test_database_path_expands_home() {
        let config = Config {
            database: PathBuf::from("~/student.db"),
            ..Config::default()
        };
        let path = config.database_path().unwrap();
        assert!(!path.to_string_lossy().starts_with('~'));
        assert!(path.ends_with("student.db"));
    }

    #[test]
    fn test_executor_carries_guard() {
        let config = Config {
            read_only: true,
            ..Config::default()
        };
        let executor = config.executor().unwrap();
        assert_eq!(executor.guard(), StatementGuard::ReadOnly);
        assert_eq!(executor.path(), Path::new("student.db"));
    }

    #[test]
    fn test_env_file_fills_missing_variables() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(
            &path,
            "TALKDB_TEST_ENV_FILE_KEY=from-file\nTALKDB_TEST_ENV_FILE_KEEP=from-file\n",
        )
        .unwrap();
        std::env::set_var("TALKDB_TEST_ENV_FILE_KEEP", "from-process");

        assert_eq!(load_env_file(Some(&path)), Some(path.clone()));
        assert_eq!(std::env::var("TALKDB_TEST_ENV_FILE_KEY").unwrap(), "from-file");
        assert_eq!(std::env::var("TALKDB_TEST_ENV_FILE_KEEP").unwrap(), "from-process");
    }

    #[test]
    fn test_missing_env_file_is_ignored() {
        let dir = tempdir().unwrap();
        assert_eq!(load_env_file(Some(&dir.path().join(".env"))), None);
    }
}

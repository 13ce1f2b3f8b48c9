//! Store configuration
//!
//! Loaded from a JSON file:
//!
//! ```json
//! {
//!   "name": "calibration",
//!   "data_dir": "./pathstore-data",
//!   "database": "lab",
//!   "log_level": "warn",
//!   "sync_writes": true
//! }
//! ```
//!
//! Only `name` is required. `database` defaults to `name`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::Severity;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Symbolic name of the storage instance
    pub name: String,

    /// Directory holding one subdirectory per database
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Database to use; the storage name when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    /// Minimum log severity (trace, info, warn, error, fatal)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// fsync after every appended record
    #[serde(default = "default_sync_writes")]
    pub sync_writes: bool,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./pathstore-data")
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_sync_writes() -> bool {
    true
}

impl StoreConfig {
    /// Config with defaults for everything but the name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_dir: default_data_dir(),
            database: None,
            log_level: default_log_level(),
            sync_writes: default_sync_writes(),
        }
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: StoreConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid("name must not be empty".to_string()));
        }

        let database = self.database_name();
        if database.is_empty()
            || database == "."
            || database == ".."
            || database.contains(['/', '\\'])
        {
            return Err(ConfigError::Invalid(format!(
                "database name '{}' is not a valid directory name",
                database
            )));
        }

        if Severity::parse(&self.log_level).is_none() {
            return Err(ConfigError::Invalid(format!(
                "Invalid log_level: '{}'. Must be one of trace, info, warn, error, fatal.",
                self.log_level
            )));
        }

        Ok(())
    }

    /// Database actually used: explicit `database`, else the storage name
    pub fn database_name(&self) -> &str {
        self.database
            .as_deref()
            .filter(|db| !db.is_empty())
            .unwrap_or(&self.name)
    }

    /// Parsed log level, `Warn` if unparseable
    pub fn log_severity(&self) -> Severity {
        Severity::parse(&self.log_level).unwrap_or(Severity::Warn)
    }
}

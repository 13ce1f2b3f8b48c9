//! CLI-specific error types

use std::fmt;
use std::io;

use crate::config::ConfigError;
use crate::tree::TreeError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdout, config file write)
    IoError,
    /// Config file already present
    AlreadyInitialized,
    /// `--value` is not valid JSON or not a storable value
    InvalidValue,
    /// Storage operation failed; carries the storage error code
    Storage(&'static str),
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "PATHSTORE_CLI_CONFIG_ERROR",
            Self::IoError => "PATHSTORE_CLI_IO_ERROR",
            Self::AlreadyInitialized => "PATHSTORE_CLI_ALREADY_INITIALIZED",
            Self::InvalidValue => "PATHSTORE_CLI_INVALID_VALUE",
            Self::Storage(code) => code,
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn already_initialized(path: &std::path::Path) -> Self {
        Self::new(
            CliErrorCode::AlreadyInitialized,
            format!("Config file {} already exists", path.display()),
        )
    }

    pub fn invalid_value(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidValue, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::config_error(e.to_string())
    }
}

impl From<TreeError> for CliError {
    fn from(e: TreeError) -> Self {
        Self::new(CliErrorCode::Storage(e.code()), e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_keeps_code() {
        let err = CliError::from(TreeError::NotImplemented("search"));
        assert_eq!(err.code_str(), "PATHSTORE_NOT_IMPLEMENTED");
        assert_eq!(err.message(), "Not implemented: search");
    }

    #[test]
    fn test_display() {
        let err = CliError::invalid_value("expected JSON");
        assert_eq!(err.to_string(), "PATHSTORE_CLI_INVALID_VALUE: expected JSON");
    }
}

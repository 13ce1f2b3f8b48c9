//! Backend error types
//!
//! Error codes:
//! - PATHSTORE_BACKEND_IO_ERROR (ERROR severity)
//! - PATHSTORE_BACKEND_WRITE_FAILED (ERROR severity)
//! - PATHSTORE_BACKEND_READ_FAILED (ERROR severity)
//! - PATHSTORE_BACKEND_SERIALIZATION (ERROR severity)
//! - PATHSTORE_DATA_CORRUPTION (FATAL severity)

use std::fmt;
use std::io;

/// Severity of a backend error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation fails, the store stays usable
    Error,
    /// The collection can no longer be trusted
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Backend error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendErrorCode {
    /// Disk or lock failure
    IoError,
    /// Document write failed
    WriteFailed,
    /// Document read failed
    ReadFailed,
    /// Document could not be (de)serialized
    Serialization,
    /// Checksum failure or truncated record
    DataCorruption,
}

impl BackendErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            BackendErrorCode::IoError => "PATHSTORE_BACKEND_IO_ERROR",
            BackendErrorCode::WriteFailed => "PATHSTORE_BACKEND_WRITE_FAILED",
            BackendErrorCode::ReadFailed => "PATHSTORE_BACKEND_READ_FAILED",
            BackendErrorCode::Serialization => "PATHSTORE_BACKEND_SERIALIZATION",
            BackendErrorCode::DataCorruption => "PATHSTORE_DATA_CORRUPTION",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            BackendErrorCode::DataCorruption => Severity::Fatal,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for BackendErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Backend error with code, message and optional context
#[derive(Debug)]
pub struct BackendError {
    code: BackendErrorCode,
    message: String,
    details: Option<String>,
    source: Option<io::Error>,
}

impl BackendError {
    fn new(code: BackendErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// I/O failure outside of a specific read or write
    pub fn io_error(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            source: Some(source),
            ..Self::new(BackendErrorCode::IoError, message)
        }
    }

    /// Internal lock was poisoned by a panicking writer
    pub fn lock_poisoned(what: &str) -> Self {
        Self::new(
            BackendErrorCode::IoError,
            format!("{} lock poisoned by a panicked writer", what),
        )
    }

    pub fn write_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            source: Some(source),
            ..Self::new(BackendErrorCode::WriteFailed, message)
        }
    }

    pub fn read_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            source: Some(source),
            ..Self::new(BackendErrorCode::ReadFailed, message)
        }
    }

    /// Document body could not be encoded or decoded
    pub fn serialization(document_id: &str, err: serde_json::Error) -> Self {
        Self {
            details: Some(format!("document_id: {}", document_id)),
            ..Self::new(BackendErrorCode::Serialization, err.to_string())
        }
    }

    /// Data corruption (FATAL)
    pub fn data_corruption(message: impl Into<String>) -> Self {
        Self::new(BackendErrorCode::DataCorruption, message)
    }

    /// Data corruption with byte offset context
    pub fn corruption_at_offset(offset: u64, reason: impl Into<String>) -> Self {
        Self {
            details: Some(format!("byte_offset: {}", offset)),
            ..Self::new(BackendErrorCode::DataCorruption, reason)
        }
    }

    pub fn code(&self) -> BackendErrorCode {
        self.code
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Whether the collection must be considered unusable
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for BackendError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corruption_is_fatal() {
        let err = BackendError::data_corruption("checksum mismatch");
        assert!(err.is_fatal());
        assert_eq!(err.code().code(), "PATHSTORE_DATA_CORRUPTION");
    }

    #[test]
    fn test_write_failed_not_fatal() {
        let err = BackendError::write_failed(
            "disk full",
            io::Error::new(io::ErrorKind::Other, "disk full"),
        );
        assert!(!err.is_fatal());
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_display_contains_context() {
        let err = BackendError::corruption_at_offset(1024, "checksum mismatch");
        let display = err.to_string();
        assert!(display.contains("FATAL"));
        assert!(display.contains("PATHSTORE_DATA_CORRUPTION"));
        assert!(display.contains("checksum mismatch"));
        assert!(display.contains("byte_offset: 1024"));
    }

    #[test]
    fn test_details_separate_from_message() {
        let err = BackendError::corruption_at_offset(64, "truncated record");
        assert_eq!(err.message(), "truncated record");
        assert_eq!(err.details(), Some("byte_offset: 64"));
        assert_eq!(BackendError::lock_poisoned("x").details(), None);
    }
}

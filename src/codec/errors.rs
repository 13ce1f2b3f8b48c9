//! # Codec Errors

use thiserror::Error;

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors raised while building or decoding numeric arrays
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("Unknown dtype: {0}")]
    UnknownDType(String),

    #[error("Shape {shape:?} holds {expected} elements, got {actual}")]
    ShapeMismatch {
        shape: Vec<usize>,
        expected: usize,
        actual: usize,
    },

    #[error("Array has dtype {actual}, requested {expected}")]
    DTypeMismatch { expected: String, actual: String },

    #[error("Array of shape {0:?} is too large")]
    TooLarge(Vec<usize>),

    #[error("Malformed encoded array: {0}")]
    MalformedArray(String),

    #[error("Invalid array payload: {0}")]
    InvalidPayload(String),
}

impl CodecError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        "PATHSTORE_CODEC_ERROR"
    }
}

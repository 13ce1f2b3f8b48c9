//! # Tree Storage Errors

use std::fmt;

use thiserror::Error;

use crate::backend::BackendError;
use crate::codec::CodecError;

/// Result type for tree storage operations
pub type TreeResult<T> = Result<T, TreeError>;

/// Why a read found no data at a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissReason {
    /// No child with that tag under the parent
    NotFound,
    /// The path ends on an internal node, not a leaf
    NotALeaf,
    /// The path passes through a leaf
    NotANode,
}

impl fmt::Display for MissReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissReason::NotFound => write!(f, "cannot be found"),
            MissReason::NotALeaf => write!(f, "is not a leaf"),
            MissReason::NotANode => write!(f, "is not a node"),
        }
    }
}

/// Which side of node/leaf exclusivity a write ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteConflict {
    /// Storing a value where an internal node lives
    InternalNode,
    /// Descending through a leaf
    Leaf,
}

impl fmt::Display for WriteConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteConflict::InternalNode => write!(f, "is not a leaf"),
            WriteConflict::Leaf => write!(f, "is a leaf"),
        }
    }
}

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("No data at key: tag \"{tag}\" {reason}")]
    NoDataAtKey { tag: String, reason: MissReason },

    #[error("Node already exists: tag \"{tag}\" {conflict}")]
    NodeAlreadyExists { tag: String, conflict: WriteConflict },

    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("Stored value cannot be decoded: {0}")]
    Codec(#[from] CodecError),
}

impl TreeError {
    pub(crate) fn missing(tag: &str, reason: MissReason) -> Self {
        TreeError::NoDataAtKey {
            tag: tag.to_string(),
            reason,
        }
    }

    pub(crate) fn conflict(tag: &str, conflict: WriteConflict) -> Self {
        TreeError::NodeAlreadyExists {
            tag: tag.to_string(),
            conflict,
        }
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            TreeError::InvalidArgument(_) => "PATHSTORE_INVALID_ARGUMENT",
            TreeError::NoDataAtKey { .. } => "PATHSTORE_NO_DATA_AT_KEY",
            TreeError::NodeAlreadyExists { .. } => "PATHSTORE_NODE_ALREADY_EXISTS",
            TreeError::NotImplemented(_) => "PATHSTORE_NOT_IMPLEMENTED",
            TreeError::Backend(e) => e.code().code(),
            TreeError::Codec(e) => e.code(),
        }
    }

    pub fn is_no_data_at_key(&self) -> bool {
        matches!(self, TreeError::NoDataAtKey { .. })
    }

    pub fn is_node_already_exists(&self) -> bool {
        matches!(self, TreeError::NodeAlreadyExists { .. })
    }
}

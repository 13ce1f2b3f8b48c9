//! Path-addressed tree storage
//!
//! A path is an ordered sequence of tags from the implicit root. Each tag
//! is one node document in the backend collection, linked to its parent by
//! id. A document is either a leaf (holds a value) or an internal node (has
//! children), never both.

mod errors;
mod storage;
mod traversal;

pub use errors::{MissReason, TreeError, TreeResult, WriteConflict};
pub use storage::{StorageInterface, TreeStorage};

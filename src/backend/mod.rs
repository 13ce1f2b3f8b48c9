//! Document backends
//!
//! The tree layer sees storage as one flat collection of node documents and
//! talks to it only through `DocumentBackend`: point lookups, range lookups,
//! inserts and in-place value updates. There are no multi-document
//! transactions and no uniqueness constraints.
//!
//! - `MemoryBackend`: process-local, for tests and scratch stores
//! - `FileBackend`: append-only, checksummed collection file

mod checksum;
mod document;
mod errors;
mod file;
mod memory;
mod reader;
mod record;
mod traits;

pub use checksum::compute_checksum;
pub use document::{DocumentFilter, DocumentId, NewDocument, NodeDocument, ParentMatch, ValueMatch};
pub use errors::{BackendError, BackendErrorCode, BackendResult, Severity};
pub use file::{FileBackend, COLLECTION_FILE};
pub use memory::MemoryBackend;
pub use reader::RecordReader;
pub use record::DocumentRecord;
pub use traits::DocumentBackend;

//! # Document Backend Trait

use std::sync::Arc;

use serde_json::Value;

use super::document::{DocumentFilter, DocumentId, NewDocument, NodeDocument};
use super::errors::BackendResult;

/// A flat collection of node documents.
///
/// Each call is atomic with respect to a single document. Nothing spans
/// calls: two callers may both see a document as absent and both insert it.
/// When several documents match a filter, lookups return them in insertion
/// order.
pub trait DocumentBackend: Send + Sync + std::fmt::Debug {
    /// First document matching the filter
    fn find_one(&self, filter: &DocumentFilter) -> BackendResult<Option<NodeDocument>>;

    /// All documents matching the filter
    fn find(&self, filter: &DocumentFilter) -> BackendResult<Vec<NodeDocument>>;

    /// Insert a document and return its new identifier
    fn insert_one(&self, document: NewDocument) -> BackendResult<DocumentId>;

    /// Replace the `value` field of a document in place.
    ///
    /// Returns false if no document has that id.
    fn update_value(&self, id: &DocumentId, value: Value) -> BackendResult<bool>;

    /// Number of documents matching the filter
    fn count(&self, filter: &DocumentFilter) -> BackendResult<usize> {
        self.find(filter).map(|docs| docs.len())
    }
}

impl<B: DocumentBackend + ?Sized> DocumentBackend for Arc<B> {
    fn find_one(&self, filter: &DocumentFilter) -> BackendResult<Option<NodeDocument>> {
        (**self).find_one(filter)
    }

    fn find(&self, filter: &DocumentFilter) -> BackendResult<Vec<NodeDocument>> {
        (**self).find(filter)
    }

    fn insert_one(&self, document: NewDocument) -> BackendResult<DocumentId> {
        (**self).insert_one(document)
    }

    fn update_value(&self, id: &DocumentId, value: Value) -> BackendResult<bool> {
        (**self).update_value(id, value)
    }

    fn count(&self, filter: &DocumentFilter) -> BackendResult<usize> {
        (**self).count(filter)
    }
}

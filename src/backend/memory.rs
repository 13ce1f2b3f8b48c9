//! # In-Memory Backend

use std::sync::{Mutex, MutexGuard};

use serde_json::Value;

use super::document::{DocumentFilter, DocumentId, NewDocument, NodeDocument};
use super::errors::{BackendError, BackendResult};
use super::traits::DocumentBackend;

/// Process-local collection, kept in insertion order
#[derive(Debug, Default)]
pub struct MemoryBackend {
    documents: Mutex<Vec<NodeDocument>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn documents(&self) -> BackendResult<MutexGuard<'_, Vec<NodeDocument>>> {
        self.documents
            .lock()
            .map_err(|_| BackendError::lock_poisoned("memory collection"))
    }

    /// Copy of every stored document
    pub fn snapshot(&self) -> BackendResult<Vec<NodeDocument>> {
        Ok(self.documents()?.clone())
    }
}

impl DocumentBackend for MemoryBackend {
    fn find_one(&self, filter: &DocumentFilter) -> BackendResult<Option<NodeDocument>> {
        Ok(self
            .documents()?
            .iter()
            .find(|doc| filter.matches(doc))
            .cloned())
    }

    fn find(&self, filter: &DocumentFilter) -> BackendResult<Vec<NodeDocument>> {
        Ok(self
            .documents()?
            .iter()
            .filter(|doc| filter.matches(doc))
            .cloned()
            .collect())
    }

    fn insert_one(&self, document: NewDocument) -> BackendResult<DocumentId> {
        let id = DocumentId::generate();
        self.documents()?.push(document.with_id(id.clone()));
        Ok(id)
    }

    fn update_value(&self, id: &DocumentId, value: Value) -> BackendResult<bool> {
        let mut documents = self.documents()?;
        match documents.iter_mut().find(|doc| doc.id == *id) {
            Some(doc) => {
                doc.value = Some(value);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn count(&self, filter: &DocumentFilter) -> BackendResult<usize> {
        Ok(self
            .documents()?
            .iter()
            .filter(|doc| filter.matches(doc))
            .count())
    }
}

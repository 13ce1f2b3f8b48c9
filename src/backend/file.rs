//! Append-only file backend
//!
//! One collection file per database: `<data_dir>/<database>/storage.dat`.
//!
//! - Every insert or update appends a full document record
//! - Latest record wins for a document id
//! - Opening scans and checksum-verifies the whole file; corruption is fatal
//! - Lookups are served from the in-memory index built by that scan
//!
//! Document order (for "first match" lookups) is the order in which ids
//! first appear in the file.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde_json::Value;

use super::document::{DocumentFilter, DocumentId, NewDocument, NodeDocument};
use super::errors::{BackendError, BackendResult};
use super::reader::RecordReader;
use super::record::DocumentRecord;
use super::traits::DocumentBackend;
use crate::observability::{log_event_with_fields, Event};

/// Name of the collection file inside a database directory
pub const COLLECTION_FILE: &str = "storage.dat";

#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    sync_writes: bool,
    state: Mutex<FileState>,
}

#[derive(Debug)]
struct FileState {
    file: File,
    current_offset: u64,
    documents: Vec<NodeDocument>,
    positions: HashMap<DocumentId, usize>,
}

impl FileState {
    fn apply(&mut self, doc: NodeDocument) {
        match self.positions.get(&doc.id) {
            Some(&index) => self.documents[index] = doc,
            None => {
                self.positions.insert(doc.id.clone(), self.documents.len());
                self.documents.push(doc);
            }
        }
    }
}

impl FileBackend {
    /// Open (or create) the collection of `database` under `data_dir`,
    /// syncing every append to disk.
    pub fn open(data_dir: &Path, database: &str) -> BackendResult<Self> {
        Self::open_with(data_dir, database, true)
    }

    pub fn open_with(data_dir: &Path, database: &str, sync_writes: bool) -> BackendResult<Self> {
        let db_dir = data_dir.join(database);
        if !db_dir.exists() {
            fs::create_dir_all(&db_dir).map_err(|e| {
                BackendError::write_failed(
                    format!("Failed to create database directory: {}", db_dir.display()),
                    e,
                )
            })?;
        }
        Self::open_path(&db_dir.join(COLLECTION_FILE), sync_writes)
    }

    /// Open (or create) a collection file at an explicit path.
    pub fn open_path(path: &Path, sync_writes: bool) -> BackendResult<Self> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                BackendError::write_failed(
                    format!("Failed to open collection: {}", path.display()),
                    e,
                )
            })?;

        let current_offset = file
            .metadata()
            .map_err(|e| BackendError::read_failed("Failed to read collection metadata", e))?
            .len();

        let mut state = FileState {
            file,
            current_offset,
            documents: Vec::new(),
            positions: HashMap::new(),
        };

        if current_offset > 0 {
            let path_str = path.display().to_string();
            let mut reader = RecordReader::open(path)?;
            let records = reader.read_all().map_err(|e| {
                log_event_with_fields(
                    Event::BackendCorruption,
                    &[
                        ("details", e.details().unwrap_or("")),
                        ("path", &path_str),
                        ("reason", e.message()),
                    ],
                );
                e
            })?;
            for record in records {
                state.apply(record.to_document()?);
            }
        }

        log_event_with_fields(
            Event::BackendOpen,
            &[
                ("path", &path.display().to_string()),
                ("documents", &state.documents.len().to_string()),
            ],
        );

        Ok(Self {
            path: path.to_path_buf(),
            sync_writes,
            state: Mutex::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Byte length of the collection file
    pub fn current_offset(&self) -> BackendResult<u64> {
        Ok(self.state()?.current_offset)
    }

    /// Number of distinct documents
    pub fn document_count(&self) -> BackendResult<usize> {
        Ok(self.state()?.documents.len())
    }

    fn state(&self) -> BackendResult<MutexGuard<'_, FileState>> {
        self.state
            .lock()
            .map_err(|_| BackendError::lock_poisoned("file collection"))
    }

    /// Append one document version. The in-memory index is only updated
    /// once the record is on disk.
    fn append(&self, state: &mut FileState, doc: NodeDocument) -> BackendResult<()> {
        let serialized = DocumentRecord::from_document(&doc)?.serialize();

        state.file.write_all(&serialized).map_err(|e| {
            BackendError::write_failed(format!("Failed to write document: {}", doc.id), e)
        })?;

        if self.sync_writes {
            state.file.sync_all().map_err(|e| {
                BackendError::write_failed(
                    format!("fsync failed after writing document: {}", doc.id),
                    e,
                )
            })?;
        }

        state.current_offset += serialized.len() as u64;
        state.apply(doc);
        Ok(())
    }
}

impl DocumentBackend for FileBackend {
    fn find_one(&self, filter: &DocumentFilter) -> BackendResult<Option<NodeDocument>> {
        Ok(self
            .state()?
            .documents
            .iter()
            .find(|doc| filter.matches(doc))
            .cloned())
    }

    fn find(&self, filter: &DocumentFilter) -> BackendResult<Vec<NodeDocument>> {
        Ok(self
            .state()?
            .documents
            .iter()
            .filter(|doc| filter.matches(doc))
            .cloned()
            .collect())
    }

    fn insert_one(&self, document: NewDocument) -> BackendResult<DocumentId> {
        let id = DocumentId::generate();
        let mut state = self.state()?;
        self.append(&mut state, document.with_id(id.clone()))?;
        Ok(id)
    }

    fn update_value(&self, id: &DocumentId, value: Value) -> BackendResult<bool> {
        let mut state = self.state()?;
        let updated = match state.positions.get(id) {
            Some(&index) => NodeDocument {
                value: Some(value),
                ..state.documents[index].clone()
            },
            None => return Ok(false),
        };
        self.append(&mut state, updated)?;
        Ok(true)
    }
}

//! Public storage façade
//!
//! Every operation acquires the root (creating it on first use) and hands
//! the full tag path to the traversal engine. Values go through the codec
//! at this boundary, so callers only ever see `StorageValue`s.
//!
//! # Concurrency
//!
//! Calls are synchronous and hold no backend resources between calls.
//! `save` and first-time root creation run under a per-instance write gate,
//! so writers sharing one `TreeStorage` never create duplicate siblings or
//! a second root. Writers using different instances over the same backend
//! can still race on first-time creation of a path and end up with
//! duplicate siblings; lookups then see the first one inserted. Reads do not
//! take the gate and may observe a partially created path as missing data.

use std::sync::{Mutex, MutexGuard, PoisonError};

use super::errors::{TreeError, TreeResult};
use super::traversal::Traversal;
use crate::backend::{DocumentBackend, DocumentFilter, DocumentId, FileBackend, NewDocument};
use crate::codec::{self, StorageValue};
use crate::config::StoreConfig;
use crate::observability::{log_event_with_fields, Event, Logger, MetricsRegistry, MetricsSnapshot};

/// Operations of a path-addressed store
pub trait StorageInterface {
    /// Symbolic name of the store
    fn name(&self) -> &str;

    /// Save `data` at `tags`, creating missing nodes.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `tags` is empty
    /// - `NodeAlreadyExists` if the path would overwrite an internal node or
    ///   pass through a leaf
    fn save<S: AsRef<str>>(&self, data: &StorageValue, tags: &[S]) -> TreeResult<()>;

    /// Load the value stored at `tags`.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `tags` is empty
    /// - `NoDataAtKey` if any segment is missing or the path ends on a node
    fn load<S: AsRef<str>>(&self, tags: &[S]) -> TreeResult<StorageValue>;

    /// Tags of the direct children at `tags`; empty if the path does not
    /// exist or ends on a leaf.
    fn list_children<S: AsRef<str>>(&self, tags: &[S]) -> TreeResult<Vec<String>>;

    /// `tags` extended with the greatest child tag, `None` without children.
    ///
    /// Tags compare as strings: "2" sorts after "10". Zero-pad numeric tags
    /// that should order numerically.
    fn latest_child<S: AsRef<str>>(&self, tags: &[S]) -> TreeResult<Option<Vec<String>>> {
        let latest = self.list_children(tags)?.into_iter().max();
        Ok(latest.map(|child| {
            let mut path: Vec<String> = tags.iter().map(|t| t.as_ref().to_string()).collect();
            path.push(child);
            path
        }))
    }

    /// Whether every segment of `tags` resolves to a document
    fn tag_exists<S: AsRef<str>>(&self, tags: &[S]) -> TreeResult<bool>;

    /// Content search. Not implemented.
    fn search(&self, query: &str) -> TreeResult<StorageValue>;
}

/// Tree storage over a document backend
#[derive(Debug)]
pub struct TreeStorage<B: DocumentBackend> {
    name: String,
    backend: B,
    write_gate: Mutex<()>,
    metrics: MetricsRegistry,
}

impl TreeStorage<FileBackend> {
    /// Open a file-backed store as configured. The config is validated
    /// first, so the collection never lands outside `data_dir`.
    pub fn open(config: &StoreConfig) -> TreeResult<Self> {
        config
            .validate()
            .map_err(|e| TreeError::InvalidArgument(e.to_string()))?;
        let backend =
            FileBackend::open_with(&config.data_dir, config.database_name(), config.sync_writes)?;
        Ok(Self::new(config.name.clone(), backend))
    }
}

impl<B: DocumentBackend> TreeStorage<B> {
    pub fn new(name: impl Into<String>, backend: B) -> Self {
        let name = name.into();
        log_event_with_fields(Event::StoreOpen, &[("name", &name)]);
        Self {
            name,
            backend,
            write_gate: Mutex::new(()),
            metrics: MetricsRegistry::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    fn traversal(&self) -> Traversal<'_, B> {
        Traversal::new(&self.backend, &self.metrics)
    }

    // The gate guards no data, so a poisoned gate is still usable.
    fn gate(&self) -> MutexGuard<'_, ()> {
        self.write_gate
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn root(&self) -> TreeResult<DocumentId> {
        if let Some(root) = self.backend.find_one(&DocumentFilter::root())? {
            return Ok(root.id);
        }
        let _gate = self.gate();
        self.root_gated()
    }

    /// Find-or-create the root. Caller holds the write gate.
    fn root_gated(&self) -> TreeResult<DocumentId> {
        if let Some(root) = self.backend.find_one(&DocumentFilter::root())? {
            return Ok(root.id);
        }
        let id = self.backend.insert_one(NewDocument::root())?;
        self.metrics.increment_documents_inserted();
        log_event_with_fields(
            Event::RootCreated,
            &[("id", id.as_str()), ("name", &self.name)],
        );
        Ok(id)
    }

    fn record_miss<S: AsRef<str>>(&self, tags: &[S], err: &TreeError) {
        if err.is_no_data_at_key() {
            self.metrics.increment_keys_missing();
            Logger::trace(
                Event::KeyMissing.as_str(),
                &[("path", &join_path(tags)), ("reason", &err.to_string())],
            );
        }
    }
}

impl<B: DocumentBackend> StorageInterface for TreeStorage<B> {
    fn name(&self) -> &str {
        &self.name
    }

    fn save<S: AsRef<str>>(&self, data: &StorageValue, tags: &[S]) -> TreeResult<()> {
        require_path(tags)?;
        self.metrics.increment_saves();

        let _gate = self.gate();
        let root = self.root_gated()?;
        let result = self.traversal().store_value(tags, codec::encode(data), &root);

        if let Err(ref err) = result {
            if err.is_node_already_exists() {
                self.metrics.increment_writes_rejected();
                Logger::warn(
                    Event::WriteRejected.as_str(),
                    &[("path", &join_path(tags)), ("reason", &err.to_string())],
                );
            }
        }
        result
    }

    fn load<S: AsRef<str>>(&self, tags: &[S]) -> TreeResult<StorageValue> {
        require_path(tags)?;
        self.metrics.increment_loads();

        let root = self.root()?;
        let raw = self
            .traversal()
            .resolve_value(tags, &root)
            .map_err(|err| {
                self.record_miss(tags, &err);
                err
            })?;
        Ok(codec::decode(raw)?)
    }

    fn list_children<S: AsRef<str>>(&self, tags: &[S]) -> TreeResult<Vec<String>> {
        self.metrics.increment_listings();

        let root = self.root()?;
        match self.traversal().resolve_children(tags, &root) {
            Err(err) if err.is_no_data_at_key() => Ok(Vec::new()),
            other => other,
        }
    }

    fn tag_exists<S: AsRef<str>>(&self, tags: &[S]) -> TreeResult<bool> {
        self.metrics.increment_existence_checks();

        let root = self.root()?;
        self.traversal().walk_path(tags, &root)
    }

    fn search(&self, _query: &str) -> TreeResult<StorageValue> {
        Err(TreeError::NotImplemented("search"))
    }
}

fn require_path<S: AsRef<str>>(tags: &[S]) -> TreeResult<()> {
    if tags.is_empty() {
        return Err(TreeError::InvalidArgument(
            "tag path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn join_path<S: AsRef<str>>(tags: &[S]) -> String {
    tags.iter()
        .map(|t| t.as_ref())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendError, BackendResult, MemoryBackend, NodeDocument};
    use crate::codec::NumericArray;
    use std::sync::Arc;
    use std::thread;

    fn memory_store() -> TreeStorage<MemoryBackend> {
        TreeStorage::new("test", MemoryBackend::new())
    }

    fn root_count<B: DocumentBackend>(store: &TreeStorage<B>) -> usize {
        store.backend().count(&DocumentFilter::root()).unwrap()
    }

    #[test]
    fn test_scenario_calibration() {
        let store = memory_store();
        store.save(&StorageValue::from(42), &["cal", "offset"]).unwrap();
        store.save(&StorageValue::from(7), &["cal", "gain"]).unwrap();

        let mut children = store.list_children(&["cal"]).unwrap();
        children.sort();
        assert_eq!(children, vec!["gain", "offset"]);
        assert_eq!(store.load(&["cal", "offset"]).unwrap(), StorageValue::from(42));
    }

    #[test]
    fn test_root_created_once() {
        let store = memory_store();
        assert_eq!(root_count(&store), 0);

        store.tag_exists(&["x"]).unwrap();
        store.save(&StorageValue::from(1), &["a"]).unwrap();
        store.load(&["a"]).unwrap();
        store.list_children::<&str>(&[]).unwrap();

        assert_eq!(root_count(&store), 1);
    }

    #[test]
    fn test_empty_path_rejected() {
        let store = memory_store();
        let empty: [&str; 0] = [];
        assert!(matches!(
            store.save(&StorageValue::Null, &empty),
            Err(TreeError::InvalidArgument(_))
        ));
        assert!(matches!(store.load(&empty), Err(TreeError::InvalidArgument(_))));
    }

    #[test]
    fn test_load_missing_and_list_missing() {
        let store = memory_store();
        assert!(store.load(&["x", "y"]).unwrap_err().is_no_data_at_key());
        assert!(store.list_children(&["x", "y"]).unwrap().is_empty());
        assert_eq!(store.metrics().keys_missing, 1);
    }

    #[test]
    fn test_list_children_of_leaf_is_empty() {
        let store = memory_store();
        store.save(&StorageValue::from(1), &["a", "b"]).unwrap();
        assert!(store.list_children(&["a", "b"]).unwrap().is_empty());
    }

    #[test]
    fn test_leaf_node_exclusivity() {
        let store = memory_store();
        store.save(&StorageValue::from("v"), &["a", "b"]).unwrap();

        let err = store.save(&StorageValue::from(2), &["a", "b", "c"]).unwrap_err();
        assert!(err.is_node_already_exists());
        let err = store.save(&StorageValue::from(3), &["a"]).unwrap_err();
        assert!(err.is_node_already_exists());

        assert_eq!(store.metrics().writes_rejected, 2);
        assert_eq!(store.load(&["a", "b"]).unwrap(), StorageValue::from("v"));
    }

    #[test]
    fn test_latest_child_is_lexicographic() {
        let store = memory_store();
        for tag in ["1", "2", "10"] {
            store.save(&StorageValue::from(tag), &["runs", tag]).unwrap();
        }
        assert_eq!(
            store.latest_child(&["runs"]).unwrap(),
            Some(vec!["runs".to_string(), "2".to_string()])
        );
        assert_eq!(store.latest_child(&["nothing"]).unwrap(), None);
    }

    #[test]
    fn test_tag_exists() {
        let store = memory_store();
        store.save(&StorageValue::from(1), &["a", "b"]).unwrap();

        assert!(store.tag_exists(&["a"]).unwrap());
        assert!(store.tag_exists(&["a", "b"]).unwrap());
        assert!(!store.tag_exists(&["a", "c"]).unwrap());
        assert!(!store.tag_exists(&["a", "b", "c"]).unwrap());
    }

    #[test]
    fn test_array_roundtrip() {
        let store = memory_store();
        let array = NumericArray::new(vec![2, 2], vec![1.0f32, 2.0, 3.0, 4.0]).unwrap();
        store.save(&StorageValue::from(array.clone()), &["trace"]).unwrap();

        let loaded = store.load(&["trace"]).unwrap();
        assert_eq!(loaded.as_array(), Some(&array));
    }

    #[test]
    fn test_search_not_implemented() {
        let store = memory_store();
        let err = store.search("offset > 3").unwrap_err();
        assert_eq!(err.code(), "PATHSTORE_NOT_IMPLEMENTED");
    }

    /// Serves the root lookup, fails every other read.
    #[derive(Debug, Default)]
    struct BrokenReads {
        inner: MemoryBackend,
    }

    impl DocumentBackend for BrokenReads {
        fn find_one(&self, filter: &DocumentFilter) -> BackendResult<Option<NodeDocument>> {
            if *filter == DocumentFilter::root() {
                return self.inner.find_one(filter);
            }
            Err(BackendError::lock_poisoned("test collection"))
        }

        fn find(&self, _filter: &DocumentFilter) -> BackendResult<Vec<NodeDocument>> {
            Err(BackendError::lock_poisoned("test collection"))
        }

        fn insert_one(&self, document: NewDocument) -> BackendResult<DocumentId> {
            self.inner.insert_one(document)
        }

        fn update_value(&self, id: &DocumentId, value: serde_json::Value) -> BackendResult<bool> {
            self.inner.update_value(id, value)
        }
    }

    #[test]
    fn test_backend_errors_propagate_from_reads() {
        let store = TreeStorage::new("broken", BrokenReads::default());

        assert!(matches!(
            store.list_children(&["cal"]),
            Err(TreeError::Backend(_))
        ));
        assert!(matches!(
            store.list_children::<&str>(&[]),
            Err(TreeError::Backend(_))
        ));
        assert!(matches!(store.tag_exists(&["cal"]), Err(TreeError::Backend(_))));
        assert!(matches!(store.load(&["cal"]), Err(TreeError::Backend(_))));
        assert!(matches!(store.latest_child(&["cal"]), Err(TreeError::Backend(_))));
        assert_eq!(store.metrics().keys_missing, 0);
    }

    #[test]
    fn test_concurrent_saves_share_intermediate_node() {
        let store = Arc::new(memory_store());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    let tag = format!("point{}", i);
                    store.save(&StorageValue::from(i), &["sweep", tag.as_str()]).unwrap();
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(root_count(&store), 1);
        let root = store.backend().find_one(&DocumentFilter::root()).unwrap().unwrap();
        assert_eq!(
            store.backend().count(&DocumentFilter::child(&root.id, "sweep")).unwrap(),
            1
        );
        assert_eq!(store.list_children(&["sweep"]).unwrap().len(), 8);
    }
}

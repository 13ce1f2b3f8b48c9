//! Path resolution over a flat collection
//!
//! Each step resolves one tag against the children of the current parent
//! with a single point lookup, then recurses into the match with the
//! remaining tags. Recursion depth is the path length.
//!
//! Node/leaf exclusivity is enforced here:
//! - reads never descend through a leaf and never return a node as a value
//! - writes never overwrite a node with a value and never descend through a leaf
//!
//! Nothing here is transactional. A multi-segment store that fails halfway
//! leaves the nodes it already created in place.

use serde_json::Value;

use super::errors::{MissReason, TreeError, TreeResult, WriteConflict};
use crate::backend::{DocumentBackend, DocumentFilter, DocumentId, NewDocument};
use crate::observability::{log_event_with_fields, Event, MetricsRegistry};

pub(crate) struct Traversal<'a, B: DocumentBackend + ?Sized> {
    backend: &'a B,
    metrics: &'a MetricsRegistry,
}

impl<'a, B: DocumentBackend + ?Sized> Traversal<'a, B> {
    pub(crate) fn new(backend: &'a B, metrics: &'a MetricsRegistry) -> Self {
        Self { backend, metrics }
    }

    /// Raw value stored at `tags` below `parent`.
    pub(crate) fn resolve_value<S: AsRef<str>>(
        &self,
        tags: &[S],
        parent: &DocumentId,
    ) -> TreeResult<Value> {
        let (first, rest) = split_path(tags)?;
        let tag = first.as_ref();

        if rest.is_empty() {
            let doc = self
                .backend
                .find_one(&DocumentFilter::child(parent, tag))?
                .ok_or_else(|| TreeError::missing(tag, MissReason::NotFound))?;
            doc.value
                .ok_or_else(|| TreeError::missing(tag, MissReason::NotALeaf))
        } else {
            // Only internal nodes match, so a leaf is never used as a directory.
            let doc = self
                .backend
                .find_one(&DocumentFilter::child(parent, tag).nodes_only())?
                .ok_or_else(|| TreeError::missing(tag, MissReason::NotFound))?;
            self.resolve_value(rest, &doc.id)
        }
    }

    /// Tags of the direct children of the node at `tags` below `parent`.
    pub(crate) fn resolve_children<S: AsRef<str>>(
        &self,
        tags: &[S],
        parent: &DocumentId,
    ) -> TreeResult<Vec<String>> {
        let Some((first, rest)) = tags.split_first() else {
            return Ok(self
                .backend
                .find(&DocumentFilter::children_of(parent))?
                .into_iter()
                .map(|doc| doc.tag)
                .collect());
        };
        let tag = first.as_ref();

        let doc = self
            .backend
            .find_one(&DocumentFilter::child(parent, tag))?
            .ok_or_else(|| TreeError::missing(tag, MissReason::NotFound))?;
        if doc.is_leaf() {
            return Err(TreeError::missing(tag, MissReason::NotANode));
        }
        self.resolve_children(rest, &doc.id)
    }

    /// Store `data` at `tags` below `parent`, creating missing nodes.
    pub(crate) fn store_value<S: AsRef<str>>(
        &self,
        tags: &[S],
        data: Value,
        parent: &DocumentId,
    ) -> TreeResult<()> {
        let (first, rest) = split_path(tags)?;
        let tag = first.as_ref();
        let existing = self.backend.find_one(&DocumentFilter::child(parent, tag))?;

        if rest.is_empty() {
            return match existing {
                None => self.insert_leaf(parent, tag, data),
                Some(doc) if doc.is_leaf() => {
                    if self.backend.update_value(&doc.id, data.clone())? {
                        self.metrics.increment_leaf_updates();
                        log_event_with_fields(
                            Event::LeafUpdated,
                            &[("id", doc.id.as_str()), ("tag", tag)],
                        );
                        Ok(())
                    } else {
                        self.insert_leaf(parent, tag, data)
                    }
                }
                Some(_) => Err(TreeError::conflict(tag, WriteConflict::InternalNode)),
            };
        }

        let next = match existing {
            None => {
                let id = self.backend.insert_one(NewDocument::node(parent, tag))?;
                self.metrics.increment_documents_inserted();
                log_event_with_fields(
                    Event::NodeCreated,
                    &[("id", id.as_str()), ("parent", parent.as_str()), ("tag", tag)],
                );
                id
            }
            Some(doc) if doc.is_leaf() => {
                return Err(TreeError::conflict(tag, WriteConflict::Leaf));
            }
            Some(doc) => doc.id,
        };
        self.store_value(rest, data, &next)
    }

    /// Whether every tag resolves to some document, leaf or node.
    pub(crate) fn walk_path<S: AsRef<str>>(
        &self,
        tags: &[S],
        parent: &DocumentId,
    ) -> TreeResult<bool> {
        let mut parent = parent.clone();
        for tag in tags {
            match self
                .backend
                .find_one(&DocumentFilter::child(&parent, tag.as_ref()))?
            {
                Some(doc) => parent = doc.id,
                None => return Ok(false),
            }
        }
        Ok(true)
    }

    fn insert_leaf(&self, parent: &DocumentId, tag: &str, data: Value) -> TreeResult<()> {
        let id = self
            .backend
            .insert_one(NewDocument::leaf(parent, tag, data))?;
        self.metrics.increment_documents_inserted();
        log_event_with_fields(
            Event::LeafCreated,
            &[("id", id.as_str()), ("parent", parent.as_str()), ("tag", tag)],
        );
        Ok(())
    }
}

fn split_path<S: AsRef<str>>(tags: &[S]) -> TreeResult<(&S, &[S])> {
    tags.split_first()
        .ok_or_else(|| TreeError::InvalidArgument("tag path cannot be empty".to_string()))
}

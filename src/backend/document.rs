//! Node documents and lookup filters
//!
//! Every document of a collection has the shape
//!
//! ```text
//! { "id": <uuid>, "parent": <uuid>?, "tag": <string>, "value": <json>? }
//! ```
//!
//! `parent` is absent only on the root, `value` is present only on leaves.
//! A leaf may hold JSON `null`: the field is then present with a null value,
//! which is different from the field being absent.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Backend-assigned document identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Allocate a fresh identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored node document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDocument {
    pub id: DocumentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<DocumentId>,
    pub tag: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_value"
    )]
    pub value: Option<Value>,
}

// A present `value` field always deserializes to `Some`, even when null.
fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl NodeDocument {
    pub fn is_leaf(&self) -> bool {
        self.value.is_some()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none() && self.tag.is_empty()
    }
}

/// A document about to be inserted; the backend assigns the id
#[derive(Debug, Clone, PartialEq)]
pub struct NewDocument {
    pub parent: Option<DocumentId>,
    pub tag: String,
    pub value: Option<Value>,
}

impl NewDocument {
    /// The parent-less root with an empty tag
    pub fn root() -> Self {
        Self {
            parent: None,
            tag: String::new(),
            value: None,
        }
    }

    /// An internal node
    pub fn node(parent: &DocumentId, tag: impl Into<String>) -> Self {
        Self {
            parent: Some(parent.clone()),
            tag: tag.into(),
            value: None,
        }
    }

    /// A leaf holding `value`
    pub fn leaf(parent: &DocumentId, tag: impl Into<String>, value: Value) -> Self {
        Self {
            parent: Some(parent.clone()),
            tag: tag.into(),
            value: Some(value),
        }
    }

    /// Attach the identifier chosen by the backend
    pub fn with_id(self, id: DocumentId) -> NodeDocument {
        NodeDocument {
            id,
            parent: self.parent,
            tag: self.tag,
            value: self.value,
        }
    }
}

/// Constraint on the `parent` field
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ParentMatch {
    #[default]
    Any,
    /// Field must be absent
    Absent,
    /// Field must equal the given id
    Is(DocumentId),
}

/// Constraint on the presence of the `value` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueMatch {
    #[default]
    Any,
    Present,
    Absent,
}

/// Conjunction of field constraints used by backend lookups
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentFilter {
    pub parent: ParentMatch,
    pub tag: Option<String>,
    pub value: ValueMatch,
}

impl DocumentFilter {
    /// Matches the root document
    pub fn root() -> Self {
        Self {
            parent: ParentMatch::Absent,
            tag: Some(String::new()),
            value: ValueMatch::Any,
        }
    }

    /// Matches every child of `parent`
    pub fn children_of(parent: &DocumentId) -> Self {
        Self {
            parent: ParentMatch::Is(parent.clone()),
            ..Self::default()
        }
    }

    /// Matches the child of `parent` with the given tag
    pub fn child(parent: &DocumentId, tag: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            ..Self::children_of(parent)
        }
    }

    /// Restrict matches to internal nodes
    pub fn nodes_only(mut self) -> Self {
        self.value = ValueMatch::Absent;
        self
    }

    /// Restrict matches to leaves
    pub fn leaves_only(mut self) -> Self {
        self.value = ValueMatch::Present;
        self
    }

    pub fn matches(&self, doc: &NodeDocument) -> bool {
        let parent_ok = match &self.parent {
            ParentMatch::Any => true,
            ParentMatch::Absent => doc.parent.is_none(),
            ParentMatch::Is(id) => doc.parent.as_ref() == Some(id),
        };
        let tag_ok = self.tag.as_ref().map_or(true, |tag| *tag == doc.tag);
        let value_ok = match self.value {
            ValueMatch::Any => true,
            ValueMatch::Present => doc.value.is_some(),
            ValueMatch::Absent => doc.value.is_none(),
        };
        parent_ok && tag_ok && value_ok
    }
}

//! Observable events

use std::fmt;

/// Events emitted by the store and its backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration loaded
    ConfigLoaded,
    /// A tree storage was opened over a backend
    StoreOpen,
    /// A file backend finished scanning its collection
    BackendOpen,
    /// A record failed verification (FATAL)
    BackendCorruption,

    // Tree writes
    /// The root document was inserted
    RootCreated,
    /// An internal node was inserted
    NodeCreated,
    /// A leaf was inserted
    LeafCreated,
    /// A leaf value was overwritten in place
    LeafUpdated,
    /// A write hit the node/leaf exclusivity rule
    WriteRejected,

    // Tree reads
    /// A read found no data at the requested path
    KeyMissing,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::StoreOpen => "STORE_OPEN",
            Event::BackendOpen => "BACKEND_OPEN",
            Event::BackendCorruption => "BACKEND_CORRUPTION",
            Event::RootCreated => "ROOT_CREATED",
            Event::NodeCreated => "NODE_CREATED",
            Event::LeafCreated => "LEAF_CREATED",
            Event::LeafUpdated => "LEAF_UPDATED",
            Event::WriteRejected => "WRITE_REJECTED",
            Event::KeyMissing => "KEY_MISSING",
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::BackendCorruption)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

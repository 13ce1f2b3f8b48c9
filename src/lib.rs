//! pathstore - hierarchical key/value storage over a flat document collection
//!
//! Values are addressed by tag paths such as `["cal", "offset"]`. Every tag
//! is one document holding its parent's id, so the tree lives in a single
//! flat collection behind the `DocumentBackend` trait.
//!
//! ```ignore
//! use pathstore::{MemoryBackend, StorageInterface, StorageValue, TreeStorage};
//!
//! let store = TreeStorage::new("calibration", MemoryBackend::new());
//! store.save(&StorageValue::from(42), &["cal", "offset"])?;
//! assert_eq!(store.load(&["cal", "offset"])?, StorageValue::from(42));
//! ```

pub mod backend;
pub mod cli;
pub mod codec;
pub mod config;
pub mod observability;
pub mod tree;

pub use backend::{DocumentBackend, FileBackend, MemoryBackend};
pub use codec::{DType, NumericArray, StorageValue};
pub use config::StoreConfig;
pub use tree::{StorageInterface, TreeError, TreeResult, TreeStorage};

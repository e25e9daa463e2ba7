//! Extended attribute store
//!
//! The rename pipeline only needs three primitives per file: read one
//! attribute, write one attribute, remove one attribute. Each is an
//! independent call with no atomicity across calls.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                 AttributeStore (trait)               │
//! │  get(path, name) / set(path, name, value) / remove   │
//! └───────────────┬─────────────────────┬───────────────┘
//!                 │                     │
//!                 ▼                     ▼
//! ┌───────────────────────────┐ ┌───────────────────────────┐
//! │        SystemStore        │ │        MemoryStore         │
//! │  - xattr crate syscalls   │ │  - in-process map          │
//! │  - follows symlinks       │ │  - call counters           │
//! │                           │ │  - fault injection         │
//! └───────────────────────────┘ └───────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use xattr_rename::store::{AttributeStore, SystemStore};
//! use std::path::Path;
//!
//! let store = SystemStore::new();
//! let value = store.get(Path::new("/data/report.pdf"), "user.class").unwrap();
//! store.set(Path::new("/data/report.pdf"), "user.classification", &value).unwrap();
//! store.remove(Path::new("/data/report.pdf"), "user.class").unwrap();
//! ```

mod memory;
mod system;

pub use memory::{CallCounts, MemoryStore, StoreOp};
pub use system::SystemStore;

use crate::error::XattrResult;
use std::path::Path;

/// Per-file extended attribute primitives
///
/// Implementations must be shareable across worker threads.
pub trait AttributeStore: Send + Sync {
    /// Read an attribute value. A missing attribute is `XattrError::NotFound`.
    fn get(&self, path: &Path, name: &str) -> XattrResult<Vec<u8>>;

    /// Create or replace an attribute value
    fn set(&self, path: &Path, name: &str, value: &[u8]) -> XattrResult<()>;

    /// Remove an attribute
    fn remove(&self, path: &Path, name: &str) -> XattrResult<()>;
}


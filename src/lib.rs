//! xattr-rename - Parallel Extended Attribute Renamer
//!
//! Moves the value of one extended attribute to a new attribute name across
//! large file trees without touching file contents. Built for migrating
//! metadata tags (classification labels and the like) in bulk.
//!
//! # Features
//!
//! - **Parallel Processing**: A fixed pool of worker threads overlaps the
//!   syscall latency of attribute reads and writes across files.
//!
//! - **Memory Efficient**: Bounded job queue with backpressure keeps
//!   discovery from running far ahead of processing on huge trees.
//!
//! - **Compact Progress**: One symbol per file (`+` renamed, `.` empty,
//!   `!` failed) grouped into blocks and rows with a running count.
//!
//! - **Dry Run**: `--debug` prints what each file would carry without
//!   mutating anything.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Root paths (CLI)                              │
//! └─────────────────────────────┬───────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │   Traverser ──► Job Queue (crossbeam bounded) ──► Worker Pool    │
//! │                                                   │             │
//! │                  ┌────────────────────────────────┤             │
//! │                  ▼                                ▼             │
//! │        rename: get → set → remove        debug: get only        │
//! │                  │                                │             │
//! │                  ▼                                ▼             │
//! │         ProgressReporter (+ . !)         "<target> <value> <path>"│
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The rename is three independent calls and is not atomic. See
//! [`ops::rename`] for the states a partial failure can leave behind.
//!
//! # Example
//!
//! ```bash
//! # Rename on two files
//! xattr-rename -S user.class -X user.classification a.pdf b.pdf
//!
//! # Whole tree with progress
//! xattr-rename -S user.class -X user.classification -r -v /data
//!
//! # Preview without changing anything
//! xattr-rename -S user.class -X user.classification -r --debug /data
//! ```

pub mod config;
pub mod error;
pub mod ops;
pub mod progress;
pub mod store;
pub mod walker;

pub use config::{CliArgs, RenameConfig};
pub use error::{FileOutcome, RenameError, Result, XattrError};
pub use store::{AttributeStore, MemoryStore, SystemStore};
pub use walker::{RenameCoordinator, RunSummary};

//! Error types for xattr-rename
//!
//! This module defines the error hierarchy for:
//! - Extended attribute store failures (per get/set/remove call)
//! - Configuration and CLI errors
//! - Worker thread errors
//! - The per-file outcome classification driving the progress stream
//!
//! Per-file failures never abort a run. They are carried as
//! [`FileOutcome::Failed`] values rather than propagated with `?`.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Top-level error type for the xattr-rename application
#[derive(Error, Debug)]
pub enum RenameError {
    /// Extended attribute store errors
    #[error("Extended attribute error: {0}")]
    Xattr(#[from] XattrError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Worker/concurrency errors
    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures reported by an attribute store
///
/// Each variant names the step that failed, so a caller can tell a rename
/// that never touched the file apart from one that left both names behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum XattrError {
    /// The attribute does not exist on the file
    #[error("Attribute '{name}' not found on '{path}'")]
    NotFound { path: String, name: String },

    /// Reading the attribute failed
    #[error("Failed to read attribute '{name}' on '{path}': {reason}")]
    ReadFailed {
        path: String,
        name: String,
        reason: String,
    },

    /// Writing the attribute failed
    #[error("Failed to write attribute '{name}' on '{path}': {reason}")]
    WriteFailed {
        path: String,
        name: String,
        reason: String,
    },

    /// Removing the attribute failed
    #[error("Failed to remove attribute '{name}' on '{path}': {reason}")]
    RemoveFailed {
        path: String,
        name: String,
        reason: String,
    },

    /// Platform has no extended attribute support
    #[error("Extended attributes are not supported on this platform")]
    Unsupported,
}

impl XattrError {
    /// Check if the attribute was simply absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, XattrError::NotFound { .. })
    }

    /// Check if this failure happened after the target was already written.
    ///
    /// When true, the file carries both the source and the target attribute.
    pub fn leaves_both_attributes(&self) -> bool {
        matches!(self, XattrError::RemoveFailed { .. })
    }

    pub(crate) fn not_found(path: &Path, name: &str) -> Self {
        XattrError::NotFound {
            path: path.display().to_string(),
            name: name.to_string(),
        }
    }
}

/// Configuration and CLI errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No file or directory argument given
    #[error("At least one file or directory argument is required")]
    NoPaths,

    /// Empty attribute name
    #[error("The {flag} attribute name must not be empty")]
    EmptyAttributeName { flag: &'static str },

    /// Source and target are the same attribute
    #[error("Source and target attribute are both '{name}'; nothing to rename")]
    SameAttribute { name: String },

    /// Invalid block or row size
    #[error("Invalid {what} {size}: must be at least 1")]
    InvalidGrouping { what: &'static str, size: usize },

    /// Invalid worker count
    #[error("Invalid worker count {count}: must be between 1 and {max}")]
    InvalidWorkerCount { count: usize, max: usize },

    /// Invalid queue size
    #[error("Invalid queue size {size}: must be at least {min}")]
    InvalidQueueSize { size: usize, min: usize },

    /// Invalid exclude pattern
    #[error("Invalid exclude pattern '{pattern}': {reason}")]
    InvalidExcludePattern { pattern: String, reason: String },
}

/// Worker thread errors
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Worker panicked
    #[error("Worker {id} panicked: {message}")]
    Panicked { id: usize, message: String },

    /// Worker thread could not be started
    #[error("Failed to initialize worker {id}: {reason}")]
    InitFailed { id: usize, reason: String },

    /// Job queue closed before the job could be sent
    #[error("Job queue closed unexpectedly")]
    QueueClosed,

    /// Send abandoned because shutdown was requested
    #[error("Job send cancelled by shutdown")]
    Cancelled,
}

/// Why a file was not failed but still left untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Zero-length file
    Empty,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Empty => f.write_str("empty file"),
        }
    }
}

/// Why processing a file failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FileError {
    /// The file could not be stat'd
    #[error("stat failed: {reason}")]
    Stat { reason: String },

    /// One of the get/set/remove steps failed
    #[error("rename failed: {0}")]
    Rename(#[from] XattrError),
}

/// Represents the outcome of processing a single file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Attribute moved from source to target
    Renamed { path: PathBuf },

    /// File deliberately left alone
    Skipped { path: PathBuf, reason: SkipReason },

    /// Processing failed
    Failed { path: PathBuf, error: FileError },
}

impl FileOutcome {
    /// Returns true if this outcome represents success
    pub fn is_success(&self) -> bool {
        matches!(self, FileOutcome::Renamed { .. })
    }

    /// Returns the path associated with this outcome
    pub fn path(&self) -> &Path {
        match self {
            FileOutcome::Renamed { path } => path,
            FileOutcome::Skipped { path, .. } => path,
            FileOutcome::Failed { path, .. } => path,
        }
    }

    /// Progress stream symbol for this outcome
    pub fn symbol(&self) -> char {
        match self {
            FileOutcome::Renamed { .. } => '+',
            FileOutcome::Skipped { .. } => '.',
            FileOutcome::Failed { .. } => '!',
        }
    }
}

/// Result type alias for RenameError
pub type Result<T> = std::result::Result<T, RenameError>;

/// Result type alias for XattrError
pub type XattrResult<T> = std::result::Result<T, XattrError>;

//! Per-file actions run by the workers
//!
//! This module provides:
//! - The three-step attribute rename with outcome classification
//! - The read-only inspection used by debug mode

pub mod inspect;
pub mod rename;

pub use inspect::{format_inspection, inspect_file};
pub use rename::{process_file, rename_attribute};

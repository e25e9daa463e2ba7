//! Attribute rename for a single file
//!
//! The rename is three independent store calls:
//!
//! ```text
//! get(path, source) ──► set(path, target, value) ──► remove(path, source)
//!        │                       │                          │
//!   fails: nothing          fails: nothing            fails: BOTH names
//!   changed                 changed                   now carry the value
//! ```
//!
//! The sequence is not atomic. A crash or a failed remove between the
//! second and third step leaves the file with both attributes. That state is
//! reported as a failure and never rolled back. Running again on such a file
//! retries the move; on a fully migrated file the first `get` fails and the
//! target is left untouched.

use crate::config::RenameConfig;
use crate::error::{FileError, FileOutcome, SkipReason, XattrResult};
use crate::store::AttributeStore;
use std::fs;
use std::path::Path;

/// Move the value of `source` to `target` on one file
///
/// Returns the error of the first step that failed. The error variant tells
/// which step it was (see [`crate::error::XattrError::leaves_both_attributes`]).
pub fn rename_attribute<S>(store: &S, path: &Path, source: &str, target: &str) -> XattrResult<()>
where
    S: AttributeStore + ?Sized,
{
    let value = store.get(path, source)?;
    store.set(path, target, &value)?;
    store.remove(path, source)
}

/// Stat a file, skip it if empty, otherwise rename its attribute
///
/// Zero-length files never reach the store.
pub fn process_file<S>(store: &S, path: &Path, config: &RenameConfig) -> FileOutcome
where
    S: AttributeStore + ?Sized,
{
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) => {
            return FileOutcome::Failed {
                path: path.to_path_buf(),
                error: FileError::Stat {
                    reason: e.to_string(),
                },
            }
        }
    };

    if metadata.len() == 0 {
        return FileOutcome::Skipped {
            path: path.to_path_buf(),
            reason: SkipReason::Empty,
        };
    }

    match rename_attribute(store, path, &config.source_xattr, &config.target_xattr) {
        Ok(()) => FileOutcome::Renamed {
            path: path.to_path_buf(),
        },
        Err(e) => FileOutcome::Failed {
            path: path.to_path_buf(),
            error: FileError::Rename(e),
        },
    }
}

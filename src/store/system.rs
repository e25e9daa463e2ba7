//! Operating system extended attribute store
//!
//! Thin wrapper over the `xattr` crate. Symlinks are followed, matching the
//! stat that precedes every rename.

use crate::error::{XattrError, XattrResult};
use crate::store::AttributeStore;
use std::io;
use std::path::Path;

/// Extended attributes backed by the host filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemStore;

impl SystemStore {
    /// Create a new system store
    pub fn new() -> Self {
        Self
    }

    /// Whether this platform has extended attribute support at all
    pub fn is_supported() -> bool {
        xattr::SUPPORTED_PLATFORM
    }
}

fn is_unsupported(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::Unsupported
}

impl AttributeStore for SystemStore {
    fn get(&self, path: &Path, name: &str) -> XattrResult<Vec<u8>> {
        if !Self::is_supported() {
            return Err(XattrError::Unsupported);
        }
        match xattr::get_deref(path, name) {
            Ok(Some(value)) => Ok(value),
            Ok(None) => Err(XattrError::not_found(path, name)),
            Err(e) if is_unsupported(&e) => Err(XattrError::Unsupported),
            Err(e) => Err(XattrError::ReadFailed {
                path: path.display().to_string(),
                name: name.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    fn set(&self, path: &Path, name: &str, value: &[u8]) -> XattrResult<()> {
        if !Self::is_supported() {
            return Err(XattrError::Unsupported);
        }
        xattr::set_deref(path, name, value).map_err(|e| {
            if is_unsupported(&e) {
                XattrError::Unsupported
            } else {
                XattrError::WriteFailed {
                    path: path.display().to_string(),
                    name: name.to_string(),
                    reason: e.to_string(),
                }
            }
        })
    }

    fn remove(&self, path: &Path, name: &str) -> XattrResult<()> {
        if !Self::is_supported() {
            return Err(XattrError::Unsupported);
        }
        xattr::remove_deref(path, name).map_err(|e| {
            if is_unsupported(&e) {
                XattrError::Unsupported
            } else {
                XattrError::RemoveFailed {
                    path: path.display().to_string(),
                    name: name.to_string(),
                    reason: e.to_string(),
                }
            }
        })
    }
}

//! In-memory attribute store
//!
//! Keeps attributes in a map keyed by path, counts every call, and can be
//! told to fail a given operation on a given path. Used by tests and
//! benchmarks to exercise partial-failure paths a real filesystem cannot
//! produce on demand.

use crate::error::{XattrError, XattrResult};
use crate::store::AttributeStore;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// One of the three store primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Get,
    Set,
    Remove,
}

/// Snapshot of how many times each primitive was called
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub gets: u64,
    pub sets: u64,
    pub removes: u64,
}

impl CallCounts {
    /// Total calls of any kind
    pub fn total(&self) -> u64 {
        self.gets + self.sets + self.removes
    }
}

/// Attribute store held entirely in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    attrs: Mutex<HashMap<PathBuf, HashMap<String, Vec<u8>>>>,
    faults: Mutex<HashSet<(PathBuf, StoreOp)>>,
    gets: AtomicU64,
    sets: AtomicU64,
    removes: AtomicU64,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an attribute without counting it as a call
    pub fn insert(&self, path: impl Into<PathBuf>, name: &str, value: &[u8]) {
        self.attrs
            .lock()
            .entry(path.into())
            .or_default()
            .insert(name.to_string(), value.to_vec());
    }

    /// Inspect an attribute without counting it as a call
    pub fn value(&self, path: &Path, name: &str) -> Option<Vec<u8>> {
        self.attrs.lock().get(path)?.get(name).cloned()
    }

    /// Attribute names present on a path, sorted
    pub fn names(&self, path: &Path) -> Vec<String> {
        let mut names: Vec<String> = self
            .attrs
            .lock()
            .get(path)
            .map(|attrs| attrs.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Make every future `op` on `path` fail
    pub fn fail_on(&self, path: impl Into<PathBuf>, op: StoreOp) {
        self.faults.lock().insert((path.into(), op));
    }

    /// Calls made so far
    pub fn calls(&self) -> CallCounts {
        CallCounts {
            gets: self.gets.load(Ordering::Relaxed),
            sets: self.sets.load(Ordering::Relaxed),
            removes: self.removes.load(Ordering::Relaxed),
        }
    }

    fn should_fail(&self, path: &Path, op: StoreOp) -> bool {
        self.faults.lock().contains(&(path.to_path_buf(), op))
    }
}

const INJECTED: &str = "injected failure";

impl AttributeStore for MemoryStore {
    fn get(&self, path: &Path, name: &str) -> XattrResult<Vec<u8>> {
        self.gets.fetch_add(1, Ordering::Relaxed);
        if self.should_fail(path, StoreOp::Get) {
            return Err(XattrError::ReadFailed {
                path: path.display().to_string(),
                name: name.to_string(),
                reason: INJECTED.into(),
            });
        }
        self.value(path, name)
            .ok_or_else(|| XattrError::not_found(path, name))
    }

    fn set(&self, path: &Path, name: &str, value: &[u8]) -> XattrResult<()> {
        self.sets.fetch_add(1, Ordering::Relaxed);
        if self.should_fail(path, StoreOp::Set) {
            return Err(XattrError::WriteFailed {
                path: path.display().to_string(),
                name: name.to_string(),
                reason: INJECTED.into(),
            });
        }
        self.insert(path, name, value);
        Ok(())
    }

    fn remove(&self, path: &Path, name: &str) -> XattrResult<()> {
        self.removes.fetch_add(1, Ordering::Relaxed);
        if self.should_fail(path, StoreOp::Remove) {
            return Err(XattrError::RemoveFailed {
                path: path.display().to_string(),
                name: name.to_string(),
                reason: INJECTED.into(),
            });
        }
        let mut attrs = self.attrs.lock();
        let removed = attrs.get_mut(path).and_then(|a| a.remove(name));
        match removed {
            Some(_) => {
                if attrs.get(path).is_some_and(|a| a.is_empty()) {
                    attrs.remove(path);
                }
                Ok(())
            }
            None => Err(XattrError::RemoveFailed {
                path: path.display().to_string(),
                name: name.to_string(),
                reason: "no such attribute".into(),
            }),
        }
    }
}

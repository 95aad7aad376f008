//! Partial progress for in-flight directory walks.

use std::path::{Path, PathBuf};

use dashmap::DashMap;

/// Running byte totals for directories whose walk has not finished.
///
/// An entry exists only while its directory is pending: the walk inserts
/// 0 on start, raises the total as files are read (each path's total is
/// monotonically non-decreasing, there is one writer per path), and
/// removes the entry the moment the walk resolves, successfully or not.
#[derive(Debug, Default)]
pub struct ProgressTable {
    partial: DashMap<PathBuf, u64>,
}

impl ProgressTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            partial: DashMap::new(),
        }
    }

    /// Register a directory whose walk is starting.
    pub fn begin(&self, path: impl Into<PathBuf>) {
        self.partial.insert(path.into(), 0);
    }

    /// Publish the running total for a directory mid-walk.
    pub fn update(&self, path: &Path, total: u64) {
        if let Some(mut current) = self.partial.get_mut(path) {
            debug_assert!(*current <= total, "partial total went backwards");
            *current = total;
        }
    }

    /// Remove a directory whose walk has resolved.
    pub fn finish(&self, path: &Path) {
        self.partial.remove(path);
    }

    /// Current partial total for a directory, if its walk is in flight.
    pub fn get(&self, path: &Path) -> Option<u64> {
        self.partial.get(path).map(|total| *total)
    }

    /// Number of walks currently in flight.
    pub fn len(&self) -> usize {
        self.partial.len()
    }

    /// Check if no walks are in flight.
    pub fn is_empty(&self) -> bool {
        self.partial.is_empty()
    }
}

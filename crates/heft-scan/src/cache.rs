//! Process-wide size cache.

use std::path::{Path, PathBuf};

use dashmap::DashMap;

use heft_core::{EntryKind, SizeOutcome};

/// Counts of cached outcomes, for diagnostic display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Directories with a computed size.
    pub directories: usize,
    /// Files (and other non-directories) with a computed size.
    pub files: usize,
    /// Paths cached as errors.
    pub errors: usize,
}

#[derive(Debug, Clone, Copy)]
struct CachedOutcome {
    kind: EntryKind,
    outcome: SizeOutcome,
}

/// Mapping from path to resolved size outcome, shared by every scan
/// session for the lifetime of the process.
///
/// The cache is a pure side-table: it never drives computation, it only
/// short-circuits it. `Pending` is never stored. A path is recomputed
/// only after an explicit [`clear`](SizeCache::clear); concurrent writers
/// for the same path resolve last-writer-wins, which is safe because any
/// two computations of one path agree on its size.
#[derive(Debug, Default)]
pub struct SizeCache {
    entries: DashMap<PathBuf, CachedOutcome>,
}

impl SizeCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Look up the cached outcome for a path.
    pub fn get(&self, path: &Path) -> Option<SizeOutcome> {
        self.entries.get(path).map(|cached| cached.outcome)
    }

    /// Store a final outcome for a path. `Pending` is ignored.
    pub fn put(&self, path: impl Into<PathBuf>, kind: EntryKind, outcome: SizeOutcome) {
        if !outcome.is_final() {
            debug_assert!(false, "attempted to cache a pending outcome");
            return;
        }
        self.entries.insert(path.into(), CachedOutcome { kind, outcome });
    }

    /// Drop every cached outcome.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of cached paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Counts of cached directories, files and errors.
    pub fn stats(&self) -> CacheStats {
        let mut stats = CacheStats::default();
        for cached in self.entries.iter() {
            match (cached.outcome, cached.kind) {
                (SizeOutcome::Error(_), _) => stats.errors += 1,
                (_, EntryKind::Directory) => stats.directories += 1,
                _ => stats.files += 1,
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heft_core::SizeErrorKind;

    #[test]
    fn test_get_put_roundtrip() {
        let cache = SizeCache::new();
        let path = Path::new("/scan/file");

        assert!(cache.get(path).is_none());

        cache.put(path, EntryKind::File, SizeOutcome::Computed(123));
        assert_eq!(cache.get(path), Some(SizeOutcome::Computed(123)));
    }

    #[test]
    fn test_pending_is_never_stored() {
        let cache = SizeCache::new();
        let path = Path::new("/scan/dir");

        // Release builds silently drop the write; debug builds assert.
        if !cfg!(debug_assertions) {
            cache.put(path, EntryKind::Directory, SizeOutcome::Pending);
            assert!(cache.get(path).is_none());
        }
    }

    #[test]
    fn test_errors_are_cached() {
        let cache = SizeCache::new();
        let path = Path::new("/scan/locked");

        cache.put(
            path,
            EntryKind::Directory,
            SizeOutcome::Error(SizeErrorKind::PermissionDenied),
        );
        assert_eq!(
            cache.get(path),
            Some(SizeOutcome::Error(SizeErrorKind::PermissionDenied))
        );
    }

    #[test]
    fn test_clear() {
        let cache = SizeCache::new();
        cache.put("/a", EntryKind::File, SizeOutcome::Computed(1));
        cache.put("/b", EntryKind::Directory, SizeOutcome::Computed(2));
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get(Path::new("/a")).is_none());
    }

    #[test]
    fn test_stats_counts_by_kind_and_error() {
        let cache = SizeCache::new();
        cache.put("/f1", EntryKind::File, SizeOutcome::Computed(1));
        cache.put("/f2", EntryKind::Other, SizeOutcome::Computed(0));
        cache.put("/d1", EntryKind::Directory, SizeOutcome::Computed(10));
        cache.put(
            "/locked",
            EntryKind::Directory,
            SizeOutcome::Error(SizeErrorKind::PermissionDenied),
        );

        let stats = cache.stats();
        assert_eq!(stats.files, 2);
        assert_eq!(stats.directories, 1);
        assert_eq!(stats.errors, 1);
    }

    #[test]
    fn test_last_writer_wins() {
        let cache = SizeCache::new();
        let path = Path::new("/scan/dir");
        cache.put(path, EntryKind::Directory, SizeOutcome::Computed(5));
        cache.put(path, EntryKind::Directory, SizeOutcome::Computed(7));
        assert_eq!(cache.get(path), Some(SizeOutcome::Computed(7)));
    }
}

//! File and directory sizing.

use std::path::Path;
use std::sync::Arc;

use jwalk::{Parallelism, WalkDir};

use heft_core::{EntryKind, SizeErrorKind, SizeOutcome};

use crate::bundle::{self, BundleSizer};
use crate::cache::SizeCache;
use crate::classifier;
use crate::progress::ProgressTable;

/// Resolves the size of one non-directory entry.
///
/// A single `lstat`-equivalent: no recursion, no partial state. Symlinks
/// and other special entries size as themselves, never their target.
#[derive(Clone)]
pub struct FileSizer {
    cache: Arc<SizeCache>,
}

impl FileSizer {
    /// Create a file sizer writing through to `cache`.
    pub fn new(cache: Arc<SizeCache>) -> Self {
        Self { cache }
    }

    /// Resolve the entry's length. Writes the outcome through to the
    /// cache, success or error.
    pub async fn size(&self, path: &Path, kind: EntryKind) -> SizeOutcome {
        let outcome = match tokio::fs::symlink_metadata(path).await {
            Ok(metadata) => SizeOutcome::Computed(metadata.len()),
            Err(err) => {
                classifier::report_failure(path, &err.to_string());
                SizeOutcome::Error(SizeErrorKind::PermissionDenied)
            }
        };
        self.cache.put(path, kind, outcome);
        outcome
    }
}

/// Resolves the size of one subdirectory by recursive walk, streaming
/// partial totals into the progress table while it runs.
#[derive(Clone)]
pub struct DirectorySizer {
    cache: Arc<SizeCache>,
    progress: Arc<ProgressTable>,
    bundle_sizer: Arc<dyn BundleSizer>,
    pacing_stride: u32,
}

impl DirectorySizer {
    /// Create a directory sizer.
    pub fn new(
        cache: Arc<SizeCache>,
        progress: Arc<ProgressTable>,
        bundle_sizer: Arc<dyn BundleSizer>,
        pacing_stride: u32,
    ) -> Self {
        Self {
            cache,
            progress,
            bundle_sizer,
            pacing_stride,
        }
    }

    /// Walk `path` and resolve its total.
    ///
    /// The walk runs on the blocking pool and is sequential within this
    /// one directory; sibling directories size concurrently through their
    /// own sizers. Writes the outcome through to the cache either way.
    pub async fn size(&self, path: &Path) -> SizeOutcome {
        let target = path.to_path_buf();
        let progress = Arc::clone(&self.progress);
        let bundle_sizer = Arc::clone(&self.bundle_sizer);
        let stride = self.pacing_stride;

        let outcome = tokio::task::spawn_blocking(move || {
            progress.begin(&target);
            let outcome = walk_directory(&target, &progress, bundle_sizer.as_ref(), stride);
            progress.finish(&target);
            outcome
        })
        .await
        .unwrap_or_else(|err| {
            tracing::warn!(path = %path.display(), error = %err, "directory walk task failed");
            self.progress.finish(path);
            SizeOutcome::Error(SizeErrorKind::PermissionDenied)
        });

        self.cache.put(path, EntryKind::Directory, outcome);
        outcome
    }
}

/// Recursively sum the lengths of every reachable regular file under
/// `path`, symlinks not followed.
///
/// Tolerates any number of per-entry failures; only a directory that
/// cannot be opened at all, or that yields no readable file while at
/// least one entry failed, resolves to an error. Partial knowledge wins
/// over discarding accessible bytes.
fn walk_directory(
    path: &Path,
    progress: &ProgressTable,
    bundle_sizer: &dyn BundleSizer,
    pacing_stride: u32,
) -> SizeOutcome {
    if bundle::is_opaque_bundle(path) {
        if let Some(bytes) = bundle_sizer.bundle_size(path).filter(|bytes| *bytes > 0) {
            return SizeOutcome::Computed(bytes);
        }
    }

    if let Err(err) = std::fs::read_dir(path) {
        classifier::report_failure(path, &err.to_string());
        return SizeOutcome::Error(SizeErrorKind::PermissionDenied);
    }

    let mut total: u64 = 0;
    let mut files_read: u64 = 0;
    let mut failures: u64 = 0;
    let mut since_yield: u32 = 0;

    let walker = WalkDir::new(path)
        .parallelism(Parallelism::Serial)
        .skip_hidden(false)
        .follow_links(false)
        .min_depth(1);

    for item in walker {
        match item {
            Ok(dirent) => {
                if dirent.file_type().is_file() {
                    match dirent.metadata() {
                        Ok(metadata) => {
                            total += metadata.len();
                            files_read += 1;
                            progress.update(path, total);
                        }
                        Err(err) => {
                            failures += 1;
                            classifier::report_failure(&dirent.path(), &err.to_string());
                        }
                    }
                }
            }
            Err(err) => {
                failures += 1;
                let failed = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| path.to_path_buf());
                classifier::report_failure(&failed, &err.to_string());
            }
        }

        since_yield += 1;
        if since_yield >= pacing_stride {
            since_yield = 0;
            std::thread::yield_now();
        }
    }

    if files_read == 0 && failures > 0 {
        SizeOutcome::Error(SizeErrorKind::PermissionDenied)
    } else {
        SizeOutcome::Computed(total)
    }
}

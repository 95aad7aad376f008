//! Immediate-children listing.

use std::path::Path;

use heft_core::{Entry, EntryKind, ScanError, ScanOptions};

use crate::classifier;

/// List the immediate children of `path`, non-recursively, without
/// following symlinks (a symlink classifies as [`EntryKind::Other`]).
///
/// Children come back in seed order: directories first, then everything
/// else, each group sorted by name case-insensitively. This is the order
/// later size ties break against, before any sizes are known.
///
/// Fails only when `path` itself cannot be enumerated; per-child
/// failures surface later, through sizing. When listing the filesystem
/// root with `include_protected` off, well-known OS-internal roots are
/// filtered out.
pub async fn list_children(path: &Path, options: &ScanOptions) -> Result<Vec<Entry>, ScanError> {
    let metadata = tokio::fs::symlink_metadata(path)
        .await
        .map_err(|err| ScanError::list(path, err))?;
    if !metadata.is_dir() {
        return Err(ScanError::NotADirectory {
            path: path.to_path_buf(),
        });
    }

    let filter_protected = !options.include_protected && path.parent().is_none();

    let mut read_dir = tokio::fs::read_dir(path)
        .await
        .map_err(|err| ScanError::list(path, err))?;

    let mut entries = Vec::new();
    loop {
        match read_dir.next_entry().await {
            Ok(Some(dirent)) => {
                let child = dirent.path();
                if filter_protected && classifier::is_system_root(&child) {
                    continue;
                }
                let kind = match dirent.file_type().await {
                    Ok(file_type) if file_type.is_dir() => EntryKind::Directory,
                    Ok(file_type) if file_type.is_file() => EntryKind::File,
                    Ok(_) => EntryKind::Other,
                    Err(err) => {
                        classifier::report_failure(&child, &err.to_string());
                        EntryKind::Other
                    }
                };
                entries.push(Entry::new(child, kind));
            }
            Ok(None) => break,
            Err(err) => return Err(ScanError::list(path, err)),
        }
    }

    seed_sort(&mut entries);
    Ok(entries)
}

/// Directories first, then files and everything else, each group
/// alphabetical case-insensitively.
fn seed_sort(entries: &mut [Entry]) {
    entries.sort_by_cached_key(|entry| (!entry.is_dir(), entry.name.as_str().to_lowercase()));
}

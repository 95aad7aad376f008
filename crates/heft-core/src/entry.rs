//! Listed entries and their size outcomes.

use std::path::{Path, PathBuf};

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Kind of filesystem entry, as listed. Symlinks are never followed, so
/// a symlink classifies as `Other` regardless of its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Anything else: symlinks, sockets, devices, FIFOs.
    Other,
}

impl EntryKind {
    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, EntryKind::Directory)
    }

    /// Check if this is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self, EntryKind::File)
    }
}

/// One immediate child of a scanned directory.
///
/// Immutable once listed. Identity is the path; paths are unique within
/// one listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Absolute path of the entry.
    pub path: PathBuf,
    /// File name component, for display.
    pub name: CompactString,
    /// Entry kind.
    pub kind: EntryKind,
}

impl Entry {
    /// Create an entry, deriving the display name from the path.
    pub fn new(path: impl Into<PathBuf>, kind: EntryKind) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| CompactString::new(n.to_string_lossy()))
            .unwrap_or_else(|| CompactString::new(path.to_string_lossy()));
        Self { path, name, kind }
    }

    /// Check if this entry is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    /// Path as a borrowed `Path`.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Why sizing an entry failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SizeErrorKind {
    /// The entry, or everything reachable beneath it, could not be read.
    PermissionDenied,
}

/// Resolved or in-flight size state of one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeOutcome {
    /// Size not computed yet.
    Pending,
    /// Final byte count.
    Computed(u64),
    /// Sizing failed.
    Error(SizeErrorKind),
}

impl SizeOutcome {
    /// Check if this outcome is final (`Computed` or `Error`).
    pub fn is_final(&self) -> bool {
        !matches!(self, SizeOutcome::Pending)
    }

    /// Check if this outcome is an error.
    pub fn is_error(&self) -> bool {
        matches!(self, SizeOutcome::Error(_))
    }

    /// Final byte count, if computed.
    pub fn bytes(&self) -> Option<u64> {
        match self {
            SizeOutcome::Computed(bytes) => Some(*bytes),
            _ => None,
        }
    }
}

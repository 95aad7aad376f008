//! Error types for listing failures.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that terminate a scan session before any entries are produced.
///
/// Per-entry sizing failures are not errors at this level; they resolve
/// into [`crate::SizeOutcome::Error`] on the affected entry and leave the
/// rest of the session running.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The target directory's children could not be enumerated.
    #[error("cannot list {path}: {source}")]
    List {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The target path does not exist.
    #[error("path not found: {path}")]
    NotFound { path: PathBuf },

    /// The target path is not a directory.
    #[error("not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Other error.
    #[error("{message}")]
    Other { message: String },
}

impl ScanError {
    /// Wrap an I/O failure from enumerating `path`.
    pub fn list(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::List { path, source },
        }
    }

    /// Path the failure is about, when one is known.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::List { path, .. } | Self::NotFound { path } | Self::NotADirectory { path } => {
                Some(path)
            }
            Self::Other { .. } => None,
        }
    }

    /// Raw failure text, for the observer to render or classify.
    pub fn raw_text(&self) -> String {
        match self {
            Self::List { source, .. } => source.to_string(),
            other => other.to_string(),
        }
    }
}

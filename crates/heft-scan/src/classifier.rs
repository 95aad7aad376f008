//! Classification of access failures and protected locations.
//!
//! Classification only decides how loudly a failure is logged; the
//! resolved [`SizeOutcome`](heft_core::SizeOutcome) is the same either
//! way.

use std::path::{Path, PathBuf};

use crate::bundle;

/// Roots hidden from a filesystem-root listing unless the caller opts in.
const SYSTEM_ROOTS: &[&str] = &[
    "/System",
    "/private",
    "/dev",
    "/proc",
    "/sys",
    "/run",
    "/cores",
    "/lost+found",
];

/// Location prefixes the host OS routinely protects.
const PROTECTED_PREFIXES: &[&str] = &[
    "/System/Volumes",
    "/System/Library",
    "/Library/Application Support",
    "/private/var",
    "/private/etc",
    "/Volumes",
    "/dev",
    "/proc",
    "/sys",
    "/lost+found",
    "/.Spotlight-V100",
    "/.fseventsd",
    "/.DocumentRevisions-V100",
    "/.TemporaryItems",
];

/// Per-user trees the host OS guards, relative to the home directory.
const PROTECTED_HOME_SUFFIXES: &[&str] = &[
    "Library/Containers",
    "Library/Group Containers",
    "Library/Application Support/MobileSync",
    "Library/Mail",
    "Library/Messages",
    "Library/Safari",
    "Library/Cookies",
    ".Trash",
];

/// Raw-text fragments of a permission-denial, lowercased.
const PERMISSION_PHRASES: &[&str] = &[
    "permission denied",
    "operation not permitted",
    "os error 1",
    "os error 13",
];

/// Check if `path` is one of the well-known OS-internal roots filtered
/// from a root listing by default.
pub fn is_system_root(path: &Path) -> bool {
    SYSTEM_ROOTS.iter().any(|root| Path::new(root) == path)
}

/// Check if `path` lies in a location the host OS routinely protects:
/// OS-internal trees, mounted-volume roots, user-private data
/// directories, or inside an opaque bundle.
pub fn is_protected_location(path: &Path) -> bool {
    if PROTECTED_PREFIXES
        .iter()
        .any(|prefix| path.starts_with(prefix))
    {
        return true;
    }

    if let Some(home) = dirs::home_dir() {
        if PROTECTED_HOME_SUFFIXES
            .iter()
            .any(|suffix| path.starts_with(home.join(suffix)))
        {
            return true;
        }
    }

    path.ancestors().any(bundle::is_opaque_bundle)
}

/// Check if `raw` reads like a permission denial.
pub fn is_permission_phrase(raw: &str) -> bool {
    let lowered = raw.to_lowercase();
    PERMISSION_PHRASES
        .iter()
        .any(|phrase| lowered.contains(phrase))
}

/// Decide whether an access failure is expected: a permission denial at
/// a routinely protected location. Expected failures are suppressed from
/// diagnostics; nothing else changes.
pub fn is_expected(path: &Path, raw: &str) -> bool {
    is_protected_location(path) && is_permission_phrase(raw)
}

/// Route an access-failure diagnostic. Expected failures log at `debug`,
/// everything else at `warn`.
pub fn report_failure(path: &Path, raw: &str) {
    if is_expected(path, raw) {
        tracing::debug!(path = %path.display(), error = raw, "expected access failure");
    } else {
        tracing::warn!(path = %path.display(), error = raw, "access failure");
    }
}

/// Result of an accessibility probe.
#[derive(Debug, Clone)]
pub struct AccessProbe {
    /// Probed path.
    pub path: PathBuf,
    /// Whether the path's children could be enumerated.
    pub accessible: bool,
    /// Raw failure text when not accessible.
    pub raw_error: Option<String>,
    /// Whether the failure (if any) classifies as expected.
    pub expected: bool,
}

/// Re-test whether a directory can be enumerated right now.
pub fn probe_access(path: &Path) -> AccessProbe {
    match std::fs::read_dir(path) {
        Ok(_) => AccessProbe {
            path: path.to_path_buf(),
            accessible: true,
            raw_error: None,
            expected: false,
        },
        Err(err) => {
            let raw = err.to_string();
            let expected = is_expected(path, &raw);
            AccessProbe {
                path: path.to_path_buf(),
                accessible: false,
                raw_error: Some(raw),
                expected,
            }
        }
    }
}

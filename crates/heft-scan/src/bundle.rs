//! Opaque-bundle detection and shortcut sizing.

use std::path::Path;
use std::process::Command;

/// Directory extensions the host OS treats as a single logical unit.
const BUNDLE_EXTENSIONS: &[&str] = &[
    "app",
    "appex",
    "bundle",
    "framework",
    "kext",
    "plugin",
    "prefpane",
    "photoslibrary",
    "musiclibrary",
    "tvlibrary",
    "xcappdata",
];

/// Check if `path` names an opaque bundle.
pub fn is_opaque_bundle(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            BUNDLE_EXTENSIONS
                .iter()
                .any(|bundle| ext.eq_ignore_ascii_case(bundle))
        })
}

/// Shortcut sizing strategy for opaque bundles.
///
/// Consulted before the recursive walk. Returning `None` (or a total of
/// zero) falls back to the generic walk.
pub trait BundleSizer: Send + Sync {
    /// Best-effort whole-bundle byte total.
    fn bundle_size(&self, path: &Path) -> Option<u64>;
}

/// Queries the host `du` utility for a whole-bundle total.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuBundleSizer;

impl BundleSizer for DuBundleSizer {
    fn bundle_size(&self, path: &Path) -> Option<u64> {
        let output = Command::new("du").arg("-sk").arg(path).output().ok()?;
        if !output.status.success() {
            return None;
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        let kib: u64 = stdout.split_whitespace().next()?.parse().ok()?;
        let bytes = kib.checked_mul(1024)?;
        (bytes > 0).then_some(bytes)
    }
}

/// Strategy that never short-circuits; every directory gets the walk.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkOnlyBundleSizer;

impl BundleSizer for WalkOnlyBundleSizer {
    fn bundle_size(&self, _path: &Path) -> Option<u64> {
        None
    }
}

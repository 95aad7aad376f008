//! Incremental, cached, concurrent directory-size engine.
//!
//! Given a directory, `heft-scan` computes the byte size of every
//! immediate child (files by a single length read, subdirectories by a
//! recursive walk) while streaming partial totals to observers and
//! keeping the listing sorted size-descending as results arrive.
//!
//! Key pieces:
//!
//! - **Per-child fan-out**: one tokio task per uncached child, all
//!   launched together. Directory walks run serially within one
//!   directory but concurrently with respect to each other.
//! - **Process-wide cache**: [`SizeCache`] survives individual
//!   sessions, so revisiting a directory never re-walks paths already
//!   resolved. Errors are cached too.
//! - **Partial progress**: a walk publishes its running total into a
//!   [`ProgressTable`]; the aggregator counts a path's partial total
//!   only while no final outcome exists, never both.
//! - **Failure tolerance**: unreadable entries inside a directory are
//!   absorbed into a partial total; only a fully inaccessible directory
//!   resolves to an error.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use heft_scan::{ScanOptions, ScanSession, SizeCache};
//!
//! # async fn demo() -> Result<(), heft_scan::ScanError> {
//! let cache = Arc::new(SizeCache::new());
//! let session = ScanSession::new(cache, ScanOptions::default());
//!
//! let handle = session.start(Some("/var/log".into())).await?;
//! let mut updates = handle.subscribe();
//!
//! tokio::spawn(async move {
//!     while let Ok(snapshot) = updates.recv().await {
//!         println!("{} bytes so far", snapshot.grand_total);
//!     }
//! });
//!
//! let listing = handle.wait().await?;
//! println!("total: {} bytes", listing.grand_total);
//! # Ok(())
//! # }
//! ```

mod aggregate;
mod bundle;
mod cache;
mod classifier;
mod lister;
mod progress;
mod session;
mod sizer;
mod sort;

pub use aggregate::{Aggregate, refresh_resolved, summarize};
pub use bundle::{BundleSizer, DuBundleSizer, WalkOnlyBundleSizer, is_opaque_bundle};
pub use cache::{CacheStats, SizeCache};
pub use classifier::{AccessProbe, is_expected, probe_access};
pub use lister::list_children;
pub use progress::ProgressTable;
pub use session::{ScanSession, SessionHandle};
pub use sizer::{DirectorySizer, FileSizer};
pub use sort::{compare_rows, sort_rows};

// Re-export core types for convenience
pub use heft_core::{
    Entry, EntryKind, EntryRow, ListingSnapshot, ScanError, ScanOptions, SizeErrorKind,
    SizeOutcome,
};

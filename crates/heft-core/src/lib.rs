//! Core types for heft.
//!
//! This crate provides the data model shared by the scan engine and the
//! presentation layer: listed entries, size outcomes, listing snapshots,
//! session options and error types.

mod entry;
mod error;
mod options;
mod snapshot;

pub use entry::{Entry, EntryKind, SizeErrorKind, SizeOutcome};
pub use error::ScanError;
pub use options::{ScanOptions, ScanOptionsBuilder};
pub use snapshot::{EntryRow, ListingSnapshot};

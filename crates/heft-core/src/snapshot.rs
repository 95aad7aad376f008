//! Listing snapshots pushed to observers.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::entry::{Entry, SizeOutcome};

/// Per-session view of one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRow {
    /// The listed entry.
    pub entry: Entry,
    /// Current size outcome.
    pub outcome: SizeOutcome,
    /// True while a sizer task for this entry is still running.
    pub calculating: bool,
    /// Size as the observer should read it right now: final bytes when
    /// computed, the live partial total for a pending directory, 0 for a
    /// pending file. `None` for an error outcome.
    pub resolved: Option<u64>,
}

impl EntryRow {
    /// Row for an entry whose sizer has been launched.
    pub fn pending(entry: Entry) -> Self {
        Self {
            entry,
            outcome: SizeOutcome::Pending,
            calculating: true,
            resolved: Some(0),
        }
    }

    /// Row seeded from a cached final outcome; no sizer runs for it.
    pub fn cached(entry: Entry, outcome: SizeOutcome) -> Self {
        let resolved = outcome.bytes();
        Self {
            entry,
            outcome,
            calculating: false,
            resolved,
        }
    }

    /// Check if this row carries an error outcome.
    pub fn is_error(&self) -> bool {
        self.outcome.is_error()
    }
}

/// One consistent view of a listing, pushed on every aggregator tick and
/// once more on completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingSnapshot {
    /// Directory the listing is of.
    pub root: PathBuf,
    /// Entries, in presentation order.
    pub rows: Vec<EntryRow>,
    /// Sum of final byte counts plus live partial totals; never counts a
    /// path in both forms.
    pub grand_total: u64,
    /// True while at least one entry is still calculating. Transitions to
    /// false exactly once per session.
    pub any_calculating: bool,
    /// True if any entry resolved to an error.
    pub has_errors: bool,
}

impl ListingSnapshot {
    /// Number of entries in the listing.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the listing is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

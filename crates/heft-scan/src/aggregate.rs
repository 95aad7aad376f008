//! Grand-total and status aggregation.

use heft_core::{EntryRow, SizeOutcome};

use crate::progress::ProgressTable;

/// Aggregated status of one listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Aggregate {
    /// Sum of final byte counts plus live partial totals.
    pub grand_total: u64,
    /// True while at least one entry is still calculating.
    pub any_calculating: bool,
    /// True if any entry resolved to an error.
    pub has_errors: bool,
}

/// Refresh each row's resolved size from its outcome and the live
/// progress table.
///
/// A final outcome always wins; the partial total is consulted only
/// while the row is still pending, so no path is ever counted in both
/// its partial and final form.
pub fn refresh_resolved(rows: &mut [EntryRow], progress: &ProgressTable) {
    for row in rows.iter_mut() {
        row.resolved = match row.outcome {
            SizeOutcome::Computed(bytes) => Some(bytes),
            SizeOutcome::Error(_) => None,
            SizeOutcome::Pending => {
                if row.entry.kind.is_dir() {
                    Some(progress.get(&row.entry.path).unwrap_or(0))
                } else {
                    Some(0)
                }
            }
        };
    }
}

/// Compute the grand total and status flags over refreshed rows.
/// Errors contribute nothing to the total.
pub fn summarize(rows: &[EntryRow]) -> Aggregate {
    let mut aggregate = Aggregate::default();
    for row in rows {
        aggregate.grand_total += row.resolved.unwrap_or(0);
        aggregate.any_calculating |= row.calculating;
        aggregate.has_errors |= row.outcome.is_error();
    }
    aggregate
}

#[cfg(test)]
mod tests {
    use super::*;
    use heft_core::{Entry, EntryKind, SizeErrorKind};
    use std::path::Path;

    fn pending_dir(path: &str) -> EntryRow {
        EntryRow::pending(Entry::new(path, EntryKind::Directory))
    }

    #[test]
    fn test_pending_directory_uses_partial() {
        let progress = ProgressTable::new();
        progress.begin("/r/dir");
        progress.update(Path::new("/r/dir"), 400);

        let mut rows = vec![pending_dir("/r/dir")];
        refresh_resolved(&mut rows, &progress);
        assert_eq!(rows[0].resolved, Some(400));
        assert_eq!(summarize(&rows).grand_total, 400);
    }

    #[test]
    fn test_final_outcome_wins_over_stale_partial() {
        // The walk publishes its outcome and only then drops the partial
        // entry; a tick landing in between must not count both.
        let progress = ProgressTable::new();
        progress.begin("/r/dir");
        progress.update(Path::new("/r/dir"), 400);

        let mut rows = vec![pending_dir("/r/dir")];
        rows[0].outcome = SizeOutcome::Computed(1000);
        rows[0].calculating = false;

        refresh_resolved(&mut rows, &progress);
        assert_eq!(rows[0].resolved, Some(1000));
        assert_eq!(summarize(&rows).grand_total, 1000);
    }

    #[test]
    fn test_errors_contribute_zero_and_set_flag() {
        let progress = ProgressTable::new();
        let mut rows = vec![
            EntryRow::cached(
                Entry::new("/r/ok", EntryKind::File),
                SizeOutcome::Computed(250),
            ),
            EntryRow::cached(
                Entry::new("/r/denied", EntryKind::Directory),
                SizeOutcome::Error(SizeErrorKind::PermissionDenied),
            ),
        ];
        refresh_resolved(&mut rows, &progress);

        let aggregate = summarize(&rows);
        assert_eq!(aggregate.grand_total, 250);
        assert!(aggregate.has_errors);
        assert!(!aggregate.any_calculating);
    }

    #[test]
    fn test_pending_file_contributes_zero() {
        let progress = ProgressTable::new();
        let mut rows = vec![EntryRow::pending(Entry::new("/r/file", EntryKind::File))];
        refresh_resolved(&mut rows, &progress);

        let aggregate = summarize(&rows);
        assert_eq!(aggregate.grand_total, 0);
        assert!(aggregate.any_calculating);
    }

    #[test]
    fn test_pending_directory_without_partial_contributes_zero() {
        let progress = ProgressTable::new();
        let mut rows = vec![pending_dir("/r/dir")];
        refresh_resolved(&mut rows, &progress);
        assert_eq!(rows[0].resolved, Some(0));
        assert_eq!(summarize(&rows).grand_total, 0);
    }
}

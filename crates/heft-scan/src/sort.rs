//! Presentation ordering of entry rows.

use std::cmp::Ordering;

use heft_core::EntryRow;

/// Total order over rows: resolved size descending, errors clustered at
/// the end.
///
/// Rules, applied in order:
/// 1. An error row sorts after every row with a resolved size.
/// 2. Two error rows sort by path, case-insensitive ascending.
/// 3. Two rows that are both still calculating with no size signal yet
///    (both resolve to 0) hold their existing relative order.
/// 4. Larger resolved size first; a calculating directory resolves to
///    its current partial total.
/// 5. Equal sizes fall back to path, case-insensitive ascending.
pub fn compare_rows(a: &EntryRow, b: &EntryRow) -> Ordering {
    match (a.resolved, b.resolved) {
        (None, None) => path_ci(a, b),
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(bytes_a), Some(bytes_b)) => {
            if a.calculating && b.calculating && bytes_a == 0 && bytes_b == 0 {
                return Ordering::Equal;
            }
            bytes_b
                .cmp(&bytes_a)
                .then_with(|| path_ci(a, b))
        }
    }
}

/// Sort rows in place. Stable and idempotent: re-running on an unchanged
/// slice yields the same order, so it is safe on every aggregator tick.
pub fn sort_rows(rows: &mut [EntryRow]) {
    rows.sort_by(compare_rows);
}

fn path_ci(a: &EntryRow, b: &EntryRow) -> Ordering {
    let path_a = a.entry.path.to_string_lossy().to_lowercase();
    let path_b = b.entry.path.to_string_lossy().to_lowercase();
    path_a
        .cmp(&path_b)
        .then_with(|| a.entry.path.cmp(&b.entry.path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use heft_core::{Entry, EntryKind, SizeErrorKind, SizeOutcome};

    fn computed(path: &str, bytes: u64) -> EntryRow {
        EntryRow::cached(
            Entry::new(path, EntryKind::File),
            SizeOutcome::Computed(bytes),
        )
    }

    fn errored(path: &str) -> EntryRow {
        EntryRow::cached(
            Entry::new(path, EntryKind::Directory),
            SizeOutcome::Error(SizeErrorKind::PermissionDenied),
        )
    }

    fn calculating(path: &str, partial: u64) -> EntryRow {
        let mut row = EntryRow::pending(Entry::new(path, EntryKind::Directory));
        row.resolved = Some(partial);
        row
    }

    #[test]
    fn test_size_descending_with_path_tiebreak() {
        let mut rows = vec![computed("/r/a", 10), computed("/r/c", 30), computed("/r/b", 30)];
        sort_rows(&mut rows);
        let paths: Vec<_> = rows.iter().map(|r| r.entry.path.to_str().unwrap()).collect();
        assert_eq!(paths, vec!["/r/b", "/r/c", "/r/a"]);
    }

    #[test]
    fn test_errors_cluster_after_everything() {
        // A huge in-flight partial must still sort before any error.
        let mut rows = vec![errored("/r/denied"), calculating("/r/busy", 1), computed("/r/tiny", 0)];
        sort_rows(&mut rows);
        let paths: Vec<_> = rows.iter().map(|r| r.entry.path.to_str().unwrap()).collect();
        assert_eq!(paths, vec!["/r/busy", "/r/tiny", "/r/denied"]);
    }

    #[test]
    fn test_error_pairs_by_path_case_insensitive() {
        let mut rows = vec![errored("/r/Zeta"), errored("/r/alpha")];
        sort_rows(&mut rows);
        assert_eq!(rows[0].entry.path.to_str().unwrap(), "/r/alpha");
        assert_eq!(rows[1].entry.path.to_str().unwrap(), "/r/Zeta");
    }

    #[test]
    fn test_zero_signal_rows_hold_existing_order() {
        // Both calculating, both resolved to 0, paths deliberately in
        // reverse alphabetical order: the pair must not be re-ordered.
        let mut rows = vec![calculating("/r/zz", 0), calculating("/r/aa", 0)];
        sort_rows(&mut rows);
        assert_eq!(rows[0].entry.path.to_str().unwrap(), "/r/zz");
        assert_eq!(rows[1].entry.path.to_str().unwrap(), "/r/aa");
    }

    #[test]
    fn test_partial_progress_participates_in_order() {
        let mut rows = vec![computed("/r/file", 500), calculating("/r/dir", 900)];
        sort_rows(&mut rows);
        assert_eq!(rows[0].entry.path.to_str().unwrap(), "/r/dir");
    }

    #[test]
    fn test_equal_nonzero_partials_fall_back_to_path() {
        let mut rows = vec![calculating("/r/beta", 100), calculating("/r/Alfa", 100)];
        sort_rows(&mut rows);
        assert_eq!(rows[0].entry.path.to_str().unwrap(), "/r/Alfa");
    }

    #[test]
    fn test_sort_is_idempotent() {
        let mut rows = vec![
            computed("/r/a", 10),
            errored("/r/x"),
            calculating("/r/p", 0),
            calculating("/r/q", 0),
            computed("/r/b", 10),
        ];
        sort_rows(&mut rows);
        let once = rows.clone();
        sort_rows(&mut rows);
        assert_eq!(rows, once);
    }
}

use std::path::PathBuf;
use std::time::Duration;

use heft_core::{
    Entry, EntryKind, EntryRow, ListingSnapshot, ScanError, ScanOptions, SizeErrorKind,
    SizeOutcome,
};

#[test]
fn test_entry_identity_is_path() {
    let a = Entry::new("/data/reports", EntryKind::Directory);
    let b = Entry::new("/data/reports", EntryKind::Directory);
    assert_eq!(a, b);
    assert_eq!(a.path, PathBuf::from("/data/reports"));
    assert_eq!(a.name.as_str(), "reports");
    assert!(a.is_dir());
}

#[test]
fn test_outcome_bytes_never_negative_encoded() {
    // The model only ever exposes unsigned byte counts; errors carry a
    // kind, not a sentinel value.
    let outcome = SizeOutcome::Error(SizeErrorKind::PermissionDenied);
    assert_eq!(outcome.bytes(), None);
    assert!(outcome.is_final());

    let outcome = SizeOutcome::Computed(0);
    assert_eq!(outcome.bytes(), Some(0));
    assert!(!outcome.is_error());
}

#[test]
fn test_row_seeding() {
    let pending = EntryRow::pending(Entry::new("/scan/big", EntryKind::Directory));
    assert!(pending.calculating);
    assert_eq!(pending.resolved, Some(0));

    let cached = EntryRow::cached(
        Entry::new("/scan/done", EntryKind::File),
        SizeOutcome::Computed(4096),
    );
    assert!(!cached.calculating);
    assert_eq!(cached.resolved, Some(4096));
}

#[test]
fn test_snapshot_accessors() {
    let snapshot = ListingSnapshot {
        root: PathBuf::from("/scan"),
        rows: vec![EntryRow::cached(
            Entry::new("/scan/a", EntryKind::File),
            SizeOutcome::Computed(10),
        )],
        grand_total: 10,
        any_calculating: false,
        has_errors: false,
    };
    assert_eq!(snapshot.len(), 1);
    assert!(!snapshot.is_empty());
}

#[test]
fn test_snapshot_round_trips_through_json() {
    let snapshot = ListingSnapshot {
        root: PathBuf::from("/scan"),
        rows: vec![
            EntryRow::cached(
                Entry::new("/scan/a", EntryKind::File),
                SizeOutcome::Computed(10),
            ),
            EntryRow::cached(
                Entry::new("/scan/b", EntryKind::Directory),
                SizeOutcome::Error(SizeErrorKind::PermissionDenied),
            ),
        ],
        grand_total: 10,
        any_calculating: false,
        has_errors: true,
    };

    let json = serde_json::to_string(&snapshot).unwrap();
    let back: ListingSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back.rows, snapshot.rows);
    assert_eq!(back.grand_total, 10);
    assert!(back.has_errors);
}

#[test]
fn test_scan_options_builder_and_validation() {
    let options = ScanOptions::builder()
        .tick_interval(Duration::from_millis(100))
        .build()
        .unwrap();
    assert_eq!(options.tick_interval, Duration::from_millis(100));
    assert!(!options.include_protected);

    assert!(ScanOptions::builder().pacing_stride(0u32).build().is_err());
}

#[test]
fn test_scan_error_surface() {
    let err = ScanError::list(
        "/root/locked",
        std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied"),
    );
    assert_eq!(err.path().unwrap(), PathBuf::from("/root/locked").as_path());
    assert!(err.raw_text().contains("Permission denied"));
    assert!(err.to_string().contains("/root/locked"));
}

//! One scan session: listing, fan-out, aggregation, snapshot stream.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;

use heft_core::{EntryRow, ListingSnapshot, ScanError, ScanOptions, SizeOutcome};

use crate::aggregate;
use crate::bundle::{BundleSizer, DuBundleSizer};
use crate::cache::SizeCache;
use crate::lister;
use crate::progress::ProgressTable;
use crate::sizer::{DirectorySizer, FileSizer};
use crate::sort;

const SNAPSHOT_CHANNEL_SIZE: usize = 64;

/// Factory for directory listings.
///
/// Holds the process-wide [`SizeCache`], the session options and the
/// bundle-sizing strategy; each [`start`](ScanSession::start) call runs
/// one listing end to end and streams snapshots to its observers.
pub struct ScanSession {
    cache: Arc<SizeCache>,
    options: ScanOptions,
    bundle_sizer: Arc<dyn BundleSizer>,
}

impl ScanSession {
    /// Create a session factory with the default `du`-backed bundle
    /// sizer.
    pub fn new(cache: Arc<SizeCache>, options: ScanOptions) -> Self {
        Self::with_bundle_sizer(cache, options, Arc::new(DuBundleSizer))
    }

    /// Create a session factory with a custom bundle-sizing strategy.
    pub fn with_bundle_sizer(
        cache: Arc<SizeCache>,
        options: ScanOptions,
        bundle_sizer: Arc<dyn BundleSizer>,
    ) -> Self {
        Self {
            cache,
            options,
            bundle_sizer,
        }
    }

    /// Shared size cache.
    pub fn cache(&self) -> &Arc<SizeCache> {
        &self.cache
    }

    /// Start one listing. `None` targets the filesystem root.
    ///
    /// Lists the immediate children, seeds each child's state from the
    /// cache, launches one sizer task per uncached child, and returns a
    /// handle streaming [`ListingSnapshot`]s. Fails only when the target
    /// itself cannot be listed; per-child failures resolve into error
    /// rows instead.
    pub async fn start(&self, target: Option<PathBuf>) -> Result<SessionHandle, ScanError> {
        let root = target.unwrap_or_else(|| PathBuf::from(std::path::MAIN_SEPARATOR_STR));
        let entries = lister::list_children(&root, &self.options).await?;

        let progress = Arc::new(ProgressTable::new());
        let (snapshot_tx, _) = broadcast::channel(SNAPSHOT_CHANNEL_SIZE);

        let mut rows = Vec::with_capacity(entries.len());
        let mut uncached = Vec::new();
        for entry in entries {
            match self.cache.get(&entry.path) {
                Some(outcome) => rows.push(EntryRow::cached(entry, outcome)),
                None => {
                    rows.push(EntryRow::pending(entry.clone()));
                    uncached.push(entry);
                }
            }
        }

        let state = Arc::new(Mutex::new(rows));

        let file_sizer = FileSizer::new(Arc::clone(&self.cache));
        let dir_sizer = DirectorySizer::new(
            Arc::clone(&self.cache),
            Arc::clone(&progress),
            Arc::clone(&self.bundle_sizer),
            self.options.pacing_stride,
        );

        let mut sizer_handles = Vec::with_capacity(uncached.len());
        for entry in uncached {
            let state = Arc::clone(&state);
            let file_sizer = file_sizer.clone();
            let dir_sizer = dir_sizer.clone();
            sizer_handles.push(tokio::spawn(async move {
                let outcome = if entry.is_dir() {
                    dir_sizer.size(&entry.path).await
                } else {
                    file_sizer.size(&entry.path, entry.kind).await
                };
                complete_entry(&state, &entry.path, outcome).await;
            }));
        }

        let driver = tokio::spawn(drive(
            root,
            self.options.tick_interval,
            state,
            progress,
            snapshot_tx.clone(),
            sizer_handles,
        ));

        Ok(SessionHandle {
            snapshot_tx,
            driver,
        })
    }
}

/// Live handle to one running listing.
///
/// Dropping the handle (or its receivers) detaches the observer but
/// never cancels in-flight sizers: they run to completion and keep
/// populating the cache, so navigating away and back benefits from work
/// already underway.
pub struct SessionHandle {
    snapshot_tx: broadcast::Sender<ListingSnapshot>,
    driver: JoinHandle<ListingSnapshot>,
}

impl SessionHandle {
    /// Subscribe to snapshot updates. A snapshot is pushed on every
    /// aggregation tick and once more on completion.
    pub fn subscribe(&self) -> broadcast::Receiver<ListingSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Wait for the final snapshot.
    pub async fn wait(self) -> Result<ListingSnapshot, ScanError> {
        self.driver.await.map_err(|err| ScanError::Other {
            message: err.to_string(),
        })
    }
}

/// Record a sizer's final outcome on its row. Rows are addressed by
/// path; the vector may have been re-ordered by the sorter since the
/// task was spawned.
async fn complete_entry(state: &Mutex<Vec<EntryRow>>, path: &Path, outcome: SizeOutcome) {
    let mut rows = state.lock().await;
    if let Some(row) = rows.iter_mut().find(|row| row.entry.path == path) {
        row.outcome = outcome;
        row.resolved = outcome.bytes();
        row.calculating = false;
    }
}

/// Tick-driven aggregation loop: publish a snapshot on a fixed cadence
/// while entries are calculating, and once more immediately when the
/// last sizer finishes. Returns the final snapshot.
async fn drive(
    root: PathBuf,
    tick_interval: Duration,
    state: Arc<Mutex<Vec<EntryRow>>>,
    progress: Arc<ProgressTable>,
    snapshot_tx: broadcast::Sender<ListingSnapshot>,
    sizer_handles: Vec<JoinHandle<()>>,
) -> ListingSnapshot {
    let all_done = async move {
        for handle in sizer_handles {
            let _ = handle.await;
        }
    };
    tokio::pin!(all_done);

    let mut ticker = tokio::time::interval(tick_interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let snapshot = publish(&root, &state, &progress, &snapshot_tx).await;
                if !snapshot.any_calculating {
                    return snapshot;
                }
            }
            _ = &mut all_done => {
                return publish(&root, &state, &progress, &snapshot_tx).await;
            }
        }
    }
}

/// Refresh resolved sizes, re-sort the rows in place (so the next tick's
/// "existing order" is this one), summarize, and push to observers.
async fn publish(
    root: &Path,
    state: &Mutex<Vec<EntryRow>>,
    progress: &ProgressTable,
    snapshot_tx: &broadcast::Sender<ListingSnapshot>,
) -> ListingSnapshot {
    let mut rows = state.lock().await;
    aggregate::refresh_resolved(&mut rows, progress);
    sort::sort_rows(&mut rows);
    let summary = aggregate::summarize(&rows);
    let snapshot = ListingSnapshot {
        root: root.to_path_buf(),
        rows: rows.clone(),
        grand_total: summary.grand_total,
        any_calculating: summary.any_calculating,
        has_errors: summary.has_errors,
    };
    drop(rows);

    let _ = snapshot_tx.send(snapshot.clone());
    snapshot
}

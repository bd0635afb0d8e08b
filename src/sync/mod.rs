use std::{
    collections::HashSet,
    future::Future,
    sync::atomic::{
        AtomicBool,
        Ordering,
    },
    time::Instant,
};

use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    core::{
        utils::now_ms,
        KiokuError,
    },
    srs::{
        record::{
            HistoryMap,
            HistoryRecord,
        },
        ProgressTracker,
    },
};

pub mod remote;


pub use remote::HttpRemoteStore;

/// One row of the remote progress table, unique on `(user_id, item_id)`.
/// `data` holds the full record; `last_seen_at` is denormalized alongside it
/// so the server can filter without unpacking the payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressRow {
    pub user_id: String,
    pub item_id: String,
    pub data: HistoryRecord,
    pub last_seen_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl ProgressRow {
    pub fn new(user_id: &str, record: HistoryRecord, now_ms: i64) -> Self {
        ProgressRow {
            user_id: user_id.to_string(),
            item_id: record.item_id.clone(),
            last_seen_at: record.last_seen_at,
            updated_at: now_ms,
            data: record,
        }
    }
}

/// A row-oriented remote store with insert-or-replace semantics keyed by
/// `(user_id, item_id)`. The sync engine only ever pulls everything for one
/// user and upserts in batches.
pub trait RemoteStore {
    fn fetch_all(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Vec<ProgressRow>, KiokuError>> + Send;

    fn upsert_batch(
        &self,
        user_id: &str,
        rows: Vec<ProgressRow>,
    ) -> impl Future<Output = Result<(), KiokuError>> + Send;
}

/// Fold pulled rows into the local map. Last-write-wins on the record's
/// `lastSeenAt`; a tie keeps the local copy. Returns the records that must
/// be pushed back: locally newer-or-equal ones plus local-only ones.
///
/// The comparison uses client wall clocks, so a device with a skewed clock
/// can shadow a legitimately newer edit. Accepted: contention is one user
/// on a couple of devices, not many independent writers.
pub(crate) fn merge_remote(
    history: &mut HistoryMap,
    rows: Vec<ProgressRow>,
) -> Vec<HistoryRecord> {
    let mut push_candidates = Vec::new();
    let mut remote_ids = HashSet::new();

    for row in rows {
        remote_ids.insert(row.item_id.clone());

        let keep_local = match history.get(&row.item_id) {
            Some(local) if local.last_seen_at >= row.data.last_seen_at => {
                push_candidates.push(local.clone());
                true
            }
            _ => false,
        };

        if !keep_local {
            history.insert(row.item_id.clone(), row.data);
        }
    }

    for (item_id, record) in history.iter() {
        if !remote_ids.contains(item_id) {
            push_candidates.push(record.clone());
        }
    }

    push_candidates
}

/// Three-phase pull/merge/push reconciliation between the local tracker and
/// a remote store. The merged state is committed locally before the push, so
/// a failed push costs staleness, never data; a failed pull aborts before
/// any state changes.
pub struct SyncEngine<R: RemoteStore> {
    remote: R,
    in_flight: AtomicBool,
}

impl<R: RemoteStore> SyncEngine<R> {
    pub fn new(remote: R) -> Self {
        Self { remote, in_flight: AtomicBool::new(false) }
    }

    /// Reconcile once. Failures are logged and swallowed: the worst outcome
    /// for the caller is stale data until the next successful sync. An
    /// overlapping call while one is in flight does nothing.
    pub async fn sync(&self, tracker: &mut ProgressTracker, user_id: &str) {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            println!("Sync already in progress, skipping");
            return;
        }

        if let Err(e) = self.run(tracker, user_id).await {
            eprintln!("Sync failed for {}: {}", user_id, e);
        }

        self.in_flight.store(false, Ordering::SeqCst);
    }

    async fn run(&self, tracker: &mut ProgressTracker, user_id: &str) -> Result<(), KiokuError> {
        let start = Instant::now();

        let rows = self.remote.fetch_all(user_id).await?;
        let pulled = rows.len();

        let push_candidates = merge_remote(tracker.history_mut(), rows);

        // Commit the merge before pushing: newly arrived remote data stays
        // visible even if the outbound leg fails.
        tracker.save()?;

        println!(
            "Sync pulled {} rows, {} records to push ({:.2}s)",
            pulled,
            push_candidates.len(),
            start.elapsed().as_secs_f32()
        );

        if push_candidates.is_empty() {
            return Ok(());
        }

        let now = now_ms();
        let rows: Vec<ProgressRow> = push_candidates
            .into_iter()
            .map(|record| ProgressRow::new(user_id, record, now))
            .collect();

        self.remote.upsert_batch(user_id, rows).await?;

        println!("Sync completed for {} ({:.2}s)", user_id, start.elapsed().as_secs_f32());
        Ok(())
    }
}

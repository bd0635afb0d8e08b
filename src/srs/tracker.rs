use std::path::PathBuf;

use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    core::{
        utils::now_ms,
        KiokuError,
        SourceItem,
    },
    persistence::get_data_file_path,
    srs::{
        record::{
            HistoryMap,
            HistoryRecord,
        },
        scheduler,
    },
};

/// Repeated exposures inside this window collapse into one event
/// (e.g. the same item re-rendered by the UI).
pub const EXPOSURE_DEBOUNCE_MS: i64 = 2_000;

const PROGRESS_FILE: &str = "progress.json";

/// On-disk snapshot format. The whole map is rewritten after every
/// mutation, so the file always reflects current state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressData {
    pub history: HistoryMap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressStats {
    pub total: usize,
    pub mastered: usize,
    pub due: usize,
}

/// The progress repository: owns the history map and its snapshot file.
/// All mutations go through `&mut self`, so in-process writers are
/// serialized by construction.
#[derive(Debug)]
pub struct ProgressTracker {
    data: ProgressData,
    file_path: PathBuf,
}

impl ProgressTracker {
    /// Load from the default snapshot location in the app data dir.
    pub fn load() -> Result<Self, KiokuError> {
        Self::load_from(get_data_file_path(PROGRESS_FILE))
    }

    /// Load from an explicit snapshot path. Missing file means a fresh,
    /// empty history.
    pub fn load_from(file_path: PathBuf) -> Result<Self, KiokuError> {
        let data = if file_path.exists() {
            let content = std::fs::read_to_string(&file_path)
                .map_err(|e| KiokuError::Custom(format!("Failed to read progress: {}", e)))?;

            serde_json::from_str::<ProgressData>(&content)
                .map_err(|e| KiokuError::Custom(format!("Failed to parse progress: {}", e)))?
        } else {
            ProgressData::default()
        };

        Ok(Self { data, file_path })
    }

    pub fn save(&self) -> Result<(), KiokuError> {
        if let Some(parent) = self.file_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                KiokuError::Custom(format!("Failed to create progress directory: {}", e))
            })?;
        }

        let content = serde_json::to_string_pretty(&self.data)
            .map_err(|e| KiokuError::Custom(format!("Failed to serialize progress: {}", e)))?;

        std::fs::write(&self.file_path, content)
            .map_err(|e| KiokuError::Custom(format!("Failed to write progress: {}", e)))
    }

    /// Record that the given items were seen. Items without an id are
    /// ignored; items seen again within the debounce window are skipped.
    /// The snapshot is rewritten once if anything changed.
    pub fn record_exposures(&mut self, items: &[SourceItem]) -> Result<(), KiokuError> {
        self.record_exposures_at(items, now_ms())
    }

    pub(crate) fn record_exposures_at(
        &mut self,
        items: &[SourceItem],
        now_ms: i64,
    ) -> Result<(), KiokuError> {
        let mut changed = false;

        for item in items {
            if item.id.is_empty() {
                continue;
            }

            match self.data.history.get_mut(&item.id) {
                Some(record) => {
                    if now_ms - record.last_seen_at < EXPOSURE_DEBOUNCE_MS {
                        continue;
                    }
                    record.exposure_count += 1;
                    record.last_seen_at = now_ms;
                    changed = true;
                }
                None => {
                    self.data
                        .history
                        .insert(item.id.clone(), HistoryRecord::from_source(item, now_ms));
                    changed = true;
                }
            }
        }

        if changed {
            self.save()?;
        }
        Ok(())
    }

    /// Apply a review answer. Unknown ids are a silent no-op so a stale
    /// review UI can never poison the map.
    pub fn review_item(&mut self, item_id: &str, quality: u8) -> Result<(), KiokuError> {
        self.review_item_at(item_id, quality, now_ms())
    }

    pub(crate) fn review_item_at(
        &mut self,
        item_id: &str,
        quality: u8,
        now_ms: i64,
    ) -> Result<(), KiokuError> {
        if let Some(record) = self.data.history.get_mut(item_id) {
            let outcome = scheduler::next_review(record, quality, now_ms);

            record.interval = outcome.interval;
            record.ease_factor = outcome.ease_factor;
            record.repetitions = outcome.repetitions;
            record.next_review_date = Some(outcome.next_review_date);
            record.is_mastered = outcome.is_mastered;
            record.last_seen_at = now_ms;

            self.save()?;
        }
        Ok(())
    }

    /// Flip the mastered flag regardless of the scheduler's opinion.
    /// No-op for unknown ids.
    pub fn toggle_mastery(&mut self, item_id: &str) -> Result<(), KiokuError> {
        if let Some(record) = self.data.history.get_mut(item_id) {
            record.is_mastered = !record.is_mastered;
            self.save()?;
        }
        Ok(())
    }

    /// Non-mastered records whose review time has passed, most overdue
    /// first. Records that have never been scheduled sort to the front.
    pub fn due_items(&self) -> Vec<HistoryRecord> {
        self.due_items_at(now_ms())
    }

    pub(crate) fn due_items_at(&self, now_ms: i64) -> Vec<HistoryRecord> {
        let mut due: Vec<HistoryRecord> = self
            .data
            .history
            .values()
            .filter(|record| !record.is_mastered && record.due_at() <= now_ms)
            .cloned()
            .collect();

        due.sort_by_key(|record| record.due_at());
        due
    }

    pub fn is_mastered(&self, item_id: &str) -> bool {
        self.data.history.get(item_id).map(|record| record.is_mastered).unwrap_or(false)
    }

    /// Review and game surfaces hide mastered items.
    pub fn should_hide(&self, item_id: &str) -> bool {
        self.is_mastered(item_id)
    }

    pub fn get(&self, item_id: &str) -> Option<&HistoryRecord> {
        self.data.history.get(item_id)
    }

    pub fn history(&self) -> &HistoryMap {
        &self.data.history
    }

    pub(crate) fn history_mut(&mut self) -> &mut HistoryMap {
        &mut self.data.history
    }

    pub fn len(&self) -> usize {
        self.data.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.history.is_empty()
    }

    pub fn stats(&self) -> ProgressStats {
        self.stats_at(now_ms())
    }

    pub(crate) fn stats_at(&self, now_ms: i64) -> ProgressStats {
        let mastered = self.data.history.values().filter(|r| r.is_mastered).count();

        ProgressStats {
            total: self.data.history.len(),
            mastered,
            due: self.due_items_at(now_ms).len(),
        }
    }
}

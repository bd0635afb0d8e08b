use std::collections::HashMap;

use serde::{
    Deserialize,
    Serialize,
};

use crate::core::models::{
    ItemType,
    JlptLevel,
    SourceItem,
};

/// Ease factor assigned to a freshly created record.
pub const DEFAULT_EASE_FACTOR: f32 = 2.5;

/// Per-item learning history. One record per distinct item, keyed by the
/// item's stable id; created at first exposure and mutated forever after,
/// never deleted.
///
/// Field names on the wire are camelCase: the snapshot and remote row
/// formats are shared with other clients of the same progress table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub item_id: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub meaning: Option<String>,
    #[serde(default)]
    pub reading: Option<String>,
    #[serde(default)]
    pub jlpt: Option<JlptLevel>,
    #[serde(rename = "type", default)]
    pub item_type: Option<ItemType>,
    pub exposure_count: u32,
    pub last_seen_at: i64,       // Epoch ms; drives debounce and sync conflicts
    pub is_mastered: bool,
    pub ease_factor: f32,
    pub interval: u32,           // Days until next review; 0 = never reviewed
    pub repetitions: u32,        // Consecutive passing reviews
    #[serde(default)]
    pub next_review_date: Option<i64>, // Absent on legacy rows
}

pub type HistoryMap = HashMap<String, HistoryRecord>;

impl HistoryRecord {
    /// New record for an item seen for the first time. Display data is
    /// copied off the source item here and never refreshed by later
    /// exposures.
    pub fn from_source(item: &SourceItem, now_ms: i64) -> Self {
        HistoryRecord {
            item_id: item.id.clone(),
            text: Some(item.text.clone()),
            meaning: item.meaning.clone(),
            reading: item.reading.clone(),
            jlpt: item.jlpt,
            item_type: item.item_type,
            exposure_count: 1,
            last_seen_at: now_ms,
            is_mastered: false,
            ease_factor: DEFAULT_EASE_FACTOR,
            interval: 0,
            repetitions: 0,
            next_review_date: Some(now_ms),
        }
    }

    /// Scheduled due time, with unset (legacy) dates treated as maximally
    /// overdue.
    pub fn due_at(&self) -> i64 {
        self.next_review_date.unwrap_or(0)
    }
}

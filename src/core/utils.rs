use chrono::Utc;

/// Wall-clock milliseconds since the Unix epoch. All debounce and
/// conflict-resolution timestamps in the crate come from here.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

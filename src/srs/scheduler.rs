//! SM-2 spaced repetition scheduling
//!
//! Computes the next review interval from a 0-5 quality score:
//! - 0-2: failed recall, the item drops back to a one-day interval
//! - 3: recalled with serious difficulty
//! - 4: recalled after hesitation
//! - 5: recalled instantly

use crate::srs::record::HistoryRecord;

/// Floor for the ease factor.
pub const MIN_EASE_FACTOR: f32 = 1.3;

/// Intervals beyond this many days graduate the item out of the due queue.
pub const MASTERY_INTERVAL_DAYS: u32 = 180;

pub const DAY_MS: i64 = 86_400_000;

/// SRS fields produced by a single review.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReviewOutcome {
    pub interval: u32,
    pub ease_factor: f32,
    pub repetitions: u32,
    pub next_review_date: i64,
    pub is_mastered: bool,
}

/// Apply one SM-2 review to a record's current state. Pure function of
/// `(record, quality, now_ms)`; quality is clamped to 0..=5.
pub fn next_review(record: &HistoryRecord, quality: u8, now_ms: i64) -> ReviewOutcome {
    let quality = quality.min(5);

    let (interval, repetitions) = if quality >= 3 {
        let interval = match record.repetitions {
            0 => 1,
            1 => 6,
            _ => (record.interval as f32 * record.ease_factor).round() as u32,
        };
        (interval, record.repetitions + 1)
    } else {
        // Failed recall resets the streak
        (1, 0)
    };

    // EF' = EF + (0.1 - (5-q) * (0.08 + (5-q) * 0.02))
    let miss = (5 - quality) as f32;
    let ease_factor =
        (record.ease_factor + (0.1 - miss * (0.08 + miss * 0.02))).max(MIN_EASE_FACTOR);

    ReviewOutcome {
        interval,
        ease_factor,
        repetitions,
        next_review_date: now_ms + interval as i64 * DAY_MS,
        is_mastered: interval > MASTERY_INTERVAL_DAYS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SourceItem;
    use crate::srs::record::HistoryRecord;

    fn fresh_record() -> HistoryRecord {
        HistoryRecord::from_source(&SourceItem::new("食べる", "食べる"), 1_000)
    }

    #[test]
    fn first_pass_gives_one_day() {
        let record = fresh_record();
        let outcome = next_review(&record, 4, 10_000);

        assert_eq!(outcome.interval, 1);
        assert_eq!(outcome.repetitions, 1);
        assert_eq!(outcome.next_review_date, 10_000 + DAY_MS);
    }

    #[test]
    fn second_pass_gives_six_days() {
        let mut record = fresh_record();
        record.repetitions = 1;
        record.interval = 1;

        let outcome = next_review(&record, 5, 0);

        assert_eq!(outcome.interval, 6);
        assert_eq!(outcome.repetitions, 2);
    }

    #[test]
    fn third_pass_multiplies_by_ease() {
        let mut record = fresh_record();
        record.repetitions = 2;
        record.interval = 6;
        record.ease_factor = 2.6;

        let outcome = next_review(&record, 5, 0);

        // round(6 * 2.6) = 16
        assert_eq!(outcome.interval, 16);
        assert_eq!(outcome.repetitions, 3);
    }

    #[test]
    fn ease_factor_growth_over_passes() {
        let record = fresh_record();

        // q=4 leaves the ease factor unchanged, q=5 adds 0.1
        let after_four = next_review(&record, 4, 0);
        assert!((after_four.ease_factor - 2.5).abs() < 1e-6);

        let after_five = next_review(&record, 5, 0);
        assert!((after_five.ease_factor - 2.6).abs() < 1e-6);
    }

    #[test]
    fn fail_resets_streak_and_interval() {
        let mut record = fresh_record();
        record.repetitions = 7;
        record.interval = 42;
        record.ease_factor = 2.1;

        let outcome = next_review(&record, 2, 0);

        assert_eq!(outcome.interval, 1);
        assert_eq!(outcome.repetitions, 0);
        assert!(outcome.ease_factor < 2.1);
    }

    #[test]
    fn ease_factor_never_drops_below_floor() {
        let mut record = fresh_record();
        record.ease_factor = MIN_EASE_FACTOR;

        for _ in 0..10 {
            let outcome = next_review(&record, 0, 0);
            assert!(outcome.ease_factor >= MIN_EASE_FACTOR);
            record.ease_factor = outcome.ease_factor;
            record.interval = outcome.interval;
            record.repetitions = outcome.repetitions;
        }
    }

    #[test]
    fn long_interval_graduates() {
        let mut record = fresh_record();
        record.repetitions = 2;
        record.interval = 100;
        record.ease_factor = 2.0;

        let outcome = next_review(&record, 5, 0);

        assert_eq!(outcome.interval, 200);
        assert!(outcome.is_mastered);
    }

    #[test]
    fn quality_above_five_is_clamped() {
        let record = fresh_record();

        let outcome = next_review(&record, 9, 0);
        let reference = next_review(&record, 5, 0);

        assert_eq!(outcome, reference);
    }

    #[test]
    fn unbroken_pass_streak_is_monotonic() {
        let mut record = fresh_record();
        let mut last_interval = 0;

        for step in 0..8 {
            let outcome = next_review(&record, 4, step * DAY_MS);
            assert!(outcome.interval >= last_interval);
            assert_eq!(outcome.repetitions, record.repetitions + 1);

            last_interval = outcome.interval;
            record.interval = outcome.interval;
            record.ease_factor = outcome.ease_factor;
            record.repetitions = outcome.repetitions;
        }
    }
}

use crate::models::{HabitRecord, HabitStats};
use chrono::{Duration, NaiveDate};
use std::collections::BTreeSet;

pub fn build_stats_at(today: NaiveDate, record: Option<&HabitRecord>) -> HabitStats {
    let Some(record) = record else {
        return HabitStats::default();
    };

    HabitStats {
        total_days: record.dates.len(),
        current_streak: current_streak(&record.dates, today),
    }
}

/// Counts consecutive completed days walking back from `today`.
///
/// The run must include today: if today is not marked the streak is 0, even
/// when every earlier day is.
pub fn current_streak(dates: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut streak = 0u32;
    let mut day = today;
    while dates.contains(&day) {
        streak = streak.saturating_add(1);
        day = day - Duration::days(1);
    }
    streak
}

//! Gamification scoring engine.
//!
//! # Responsibility
//! - Convert a task snapshot into points, levels, streaks and achievements.
//! - Stay pure: no I/O, no logging, no clock reads.
//!
//! # Invariants
//! - Every function takes the evaluation moment as an explicit argument.
//! - Inputs are borrowed and never mutated.
//! - Identical input always yields identical output.

pub mod achievements;
pub mod clock;
pub mod level;
pub mod points;
pub mod stats;
pub mod streak;

pub use achievements::{evaluate_achievements, AchievementRule, UnlockRule, ACHIEVEMENT_CATALOG};
pub use clock::{Clock, FixedClock, SystemClock};
pub use level::{calculate_level, level_progress, points_to_next_level, POINTS_PER_LEVEL};
pub use points::{calculate_points, priority_bonus, BASE_POINTS, ON_TIME_BONUS};
pub use stats::{completed_subset, compute_breakdown, compute_stats};
pub use streak::calculate_streak;

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::model::task::{Priority, TaskId, TaskRecord};
    use chrono::{DateTime, FixedOffset, TimeZone, Utc};

    pub fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    pub fn at_utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<FixedOffset> {
        utc(y, m, d, h).fixed_offset()
    }

    pub fn open_task(id: &str) -> TaskRecord {
        TaskRecord::with_id(TaskId::new(id), id, utc(2025, 1, 1, 8))
    }

    pub fn done_task(id: &str, priority: Priority, completed_at: DateTime<Utc>) -> TaskRecord {
        let mut task = open_task(id);
        task.priority = priority;
        task.mark_completed(completed_at);
        task
    }
}

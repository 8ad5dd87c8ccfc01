//! Per-task point awards.

use crate::model::task::{Priority, TaskRecord};
use chrono::{DateTime, FixedOffset, Utc};

/// Flat award for every completed task.
pub const BASE_POINTS: u32 = 10;
/// Extra award when completion lands on or before the deadline.
pub const ON_TIME_BONUS: u32 = 10;

/// Bonus by priority: high 15, medium 10, low 5.
pub fn priority_bonus(priority: Priority) -> u32 {
    match priority {
        Priority::High => 15,
        Priority::Medium => 10,
        Priority::Low => 5,
    }
}

/// Returns the point value of one task.
///
/// The on-time comparison uses `completed_at`, falling back to `now` when the
/// task carries no completion stamp. The deadline is inclusive.
pub fn calculate_points(task: &TaskRecord, now: DateTime<FixedOffset>) -> u32 {
    let mut points = BASE_POINTS + priority_bonus(task.priority);

    if let Some(due_date) = task.due_date {
        let completed_at = task
            .completed_at
            .unwrap_or_else(|| now.with_timezone(&Utc));
        if completed_at <= due_date {
            points += ON_TIME_BONUS;
        }
    }

    points
}

#[cfg(test)]
mod tests {
    use super::calculate_points;
    use crate::model::task::Priority;
    use crate::scoring::fixtures::{at_utc, done_task, open_task, utc};

    #[test]
    fn priority_steps_are_five_points_apart() {
        let now = at_utc(2025, 3, 1, 12);
        let high = done_task("h", Priority::High, utc(2025, 2, 1, 9));
        let medium = done_task("m", Priority::Medium, utc(2025, 2, 1, 9));
        let low = done_task("l", Priority::Low, utc(2025, 2, 1, 9));

        assert_eq!(calculate_points(&high, now), 25);
        assert_eq!(calculate_points(&medium, now), 20);
        assert_eq!(calculate_points(&low, now), 15);
    }

    #[test]
    fn deadline_is_inclusive() {
        let mut task = done_task("t", Priority::Low, utc(2025, 1, 10, 0));
        task.due_date = Some(utc(2025, 1, 10, 0));

        assert_eq!(calculate_points(&task, at_utc(2025, 2, 1, 0)), 25);
    }

    #[test]
    fn late_completion_gets_no_bonus() {
        let mut task = done_task("t", Priority::Medium, utc(2025, 1, 11, 0));
        task.due_date = Some(utc(2025, 1, 10, 0));

        assert_eq!(calculate_points(&task, at_utc(2025, 2, 1, 0)), 20);
    }

    #[test]
    fn missing_completion_stamp_falls_back_to_now() {
        let mut task = open_task("t");
        task.priority = Priority::High;
        task.due_date = Some(utc(2025, 1, 10, 0));

        assert_eq!(calculate_points(&task, at_utc(2025, 1, 9, 0)), 35);
        assert_eq!(calculate_points(&task, at_utc(2025, 1, 11, 0)), 25);
    }

    #[test]
    fn never_below_fifteen() {
        let mut low = open_task("t");
        low.priority = Priority::Low;

        assert!(calculate_points(&low, at_utc(2030, 1, 1, 0)) >= 15);
    }
}

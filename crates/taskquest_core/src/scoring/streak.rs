//! Consecutive-day completion streak.
//!
//! # Invariants
//! - Day boundaries follow the offset carried by `now`.
//! - Counting walks backwards from today; today itself does not add to the
//!   count, each earlier consecutive day adds one.
//! - Completion dates after today neither extend nor break the streak.

use crate::model::task::TaskRecord;
use chrono::{DateTime, FixedOffset, NaiveDate};

/// Counts consecutive days, ending today, with at least one completion.
pub fn calculate_streak(completed: &[&TaskRecord], now: DateTime<FixedOffset>) -> u32 {
    let offset = *now.offset();
    let mut days: Vec<NaiveDate> = completed
        .iter()
        .filter_map(|task| task.completed_at)
        .map(|completed_at| completed_at.with_timezone(&offset).date_naive())
        .collect();
    if days.is_empty() {
        return 0;
    }

    days.sort_unstable_by(|left, right| right.cmp(left));
    days.dedup();

    let today = now.date_naive();
    let mut streak: u32 = 0;
    for day in days {
        let diff_days = (today - day).num_days();
        let counted = i64::from(streak);
        if diff_days == counted + 1 {
            streak += 1;
        } else if diff_days > counted + 1 {
            break;
        }
    }

    streak
}

#[cfg(test)]
mod tests {
    use super::calculate_streak;
    use crate::model::task::{Priority, TaskRecord};
    use crate::scoring::fixtures::{at_utc, done_task, open_task, utc};
    use chrono::{FixedOffset, TimeZone};

    fn refs(tasks: &[TaskRecord]) -> Vec<&TaskRecord> {
        tasks.iter().collect()
    }

    #[test]
    fn empty_input_has_no_streak() {
        assert_eq!(calculate_streak(&[], at_utc(2025, 1, 10, 12)), 0);
    }

    #[test]
    fn tasks_without_completion_stamp_are_ignored() {
        let tasks = vec![open_task("a")];
        assert_eq!(calculate_streak(&refs(&tasks), at_utc(2025, 1, 10, 12)), 0);
    }

    #[test]
    fn today_alone_counts_zero() {
        let tasks = vec![done_task("a", Priority::Low, utc(2025, 1, 10, 9))];
        assert_eq!(calculate_streak(&refs(&tasks), at_utc(2025, 1, 10, 12)), 0);
    }

    #[test]
    fn today_and_yesterday_counts_one() {
        let tasks = vec![
            done_task("a", Priority::Low, utc(2025, 1, 10, 9)),
            done_task("b", Priority::Low, utc(2025, 1, 9, 9)),
        ];
        assert_eq!(calculate_streak(&refs(&tasks), at_utc(2025, 1, 10, 12)), 1);
    }

    #[test]
    fn three_consecutive_days_count_two() {
        let tasks = vec![
            done_task("a", Priority::Low, utc(2025, 1, 8, 9)),
            done_task("b", Priority::Low, utc(2025, 1, 10, 9)),
            done_task("c", Priority::Low, utc(2025, 1, 9, 9)),
        ];
        assert_eq!(calculate_streak(&refs(&tasks), at_utc(2025, 1, 10, 12)), 2);
    }

    #[test]
    fn same_day_duplicates_do_not_inflate() {
        let tasks = vec![
            done_task("a", Priority::Low, utc(2025, 1, 9, 7)),
            done_task("b", Priority::Low, utc(2025, 1, 9, 18)),
            done_task("c", Priority::Low, utc(2025, 1, 8, 9)),
        ];
        assert_eq!(calculate_streak(&refs(&tasks), at_utc(2025, 1, 10, 12)), 2);
    }

    #[test]
    fn gap_breaks_the_chain() {
        let tasks = vec![
            done_task("a", Priority::Low, utc(2025, 1, 9, 9)),
            done_task("b", Priority::Low, utc(2025, 1, 6, 9)),
            done_task("c", Priority::Low, utc(2025, 1, 5, 9)),
        ];
        assert_eq!(calculate_streak(&refs(&tasks), at_utc(2025, 1, 10, 12)), 1);
    }

    #[test]
    fn stale_history_counts_zero() {
        let tasks = vec![done_task("a", Priority::Low, utc(2025, 1, 7, 9))];
        assert_eq!(calculate_streak(&refs(&tasks), at_utc(2025, 1, 10, 12)), 0);
    }

    #[test]
    fn future_completion_is_skipped() {
        let tasks = vec![
            done_task("a", Priority::Low, utc(2025, 1, 12, 9)),
            done_task("b", Priority::Low, utc(2025, 1, 9, 9)),
        ];
        assert_eq!(calculate_streak(&refs(&tasks), at_utc(2025, 1, 10, 12)), 1);
    }

    #[test]
    fn day_boundary_follows_evaluation_offset() {
        // 23:00 UTC on Jan 9 is already Jan 10 at +02:00.
        let tasks = vec![done_task("a", Priority::Low, utc(2025, 1, 9, 23))];
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = plus_two.with_ymd_and_hms(2025, 1, 11, 8, 0, 0).unwrap();

        assert_eq!(calculate_streak(&refs(&tasks), now), 1);
        assert_eq!(calculate_streak(&refs(&tasks), at_utc(2025, 1, 11, 8)), 0);
    }
}

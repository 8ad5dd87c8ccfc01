//! Stats aggregation over a task snapshot.

use crate::model::stats::{StatsBreakdown, UserStats};
use crate::model::task::{Category, Priority, TaskRecord};
use crate::scoring::achievements::evaluate_achievements;
use crate::scoring::level::{calculate_level, points_to_next_level};
use crate::scoring::points::calculate_points;
use crate::scoring::streak::calculate_streak;
use chrono::{DateTime, FixedOffset};

/// Completed tasks in input order.
pub fn completed_subset(tasks: &[TaskRecord]) -> Vec<&TaskRecord> {
    tasks.iter().filter(|task| task.completed).collect()
}

/// Composes points, level, streak and achievements into one summary.
pub fn compute_stats(tasks: &[TaskRecord], now: DateTime<FixedOffset>) -> UserStats {
    let completed = completed_subset(tasks);
    let points = completed
        .iter()
        .map(|task| calculate_points(task, now))
        .sum::<u32>();

    UserStats {
        total_tasks: tasks.len(),
        completed_tasks: completed.len(),
        points,
        level: calculate_level(points),
        points_to_next_level: points_to_next_level(points),
        streak: calculate_streak(&completed, now),
        achievements: evaluate_achievements(tasks, &completed),
    }
}

/// Counts tasks per category and priority.
pub fn compute_breakdown(tasks: &[TaskRecord]) -> StatsBreakdown {
    let by_category = Category::ALL
        .iter()
        .map(|category| {
            let count = tasks.iter().filter(|task| task.category == *category).count();
            (*category, count)
        })
        .collect();
    let by_priority = Priority::ALL
        .iter()
        .map(|priority| {
            let count = tasks.iter().filter(|task| task.priority == *priority).count();
            (*priority, count)
        })
        .collect();

    let completed = tasks.iter().filter(|task| task.completed).count();
    let completion_percent = if tasks.is_empty() {
        0
    } else {
        u32::try_from(completed * 100 / tasks.len()).unwrap_or(100)
    };

    StatsBreakdown {
        by_category,
        by_priority,
        completion_percent,
    }
}

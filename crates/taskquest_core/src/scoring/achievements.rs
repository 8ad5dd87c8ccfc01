//! Achievement catalog and evaluator.
//!
//! # Responsibility
//! - Hold the fixed achievement catalog as a constant rule table.
//! - Evaluate every rule against a completed-task snapshot.
//!
//! # Invariants
//! - Catalog order is display order and is returned unchanged.
//! - Ordinal rules ("5th completed task") count in the order the caller
//!   supplied; the evaluator never re-sorts.
//! - `unlocked` depends only on the rule; `unlocked_at` is the qualifying
//!   task's completion stamp.

use crate::model::achievement::Achievement;
use crate::model::task::{Priority, TaskRecord};

/// Unlock condition for one catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockRule {
    /// At least `n` completed tasks; qualifies on the `n`-th.
    CompletedCount(usize),
    /// At least `n` completed high-priority tasks; qualifies on the `n`-th.
    HighPriorityCount(usize),
    /// Any completion on or before its deadline; qualifies on the first.
    CompletedBeforeDue,
}

impl UnlockRule {
    /// Returns the task whose completion satisfied this rule, if any.
    pub fn qualifying_task<'a>(self, completed: &[&'a TaskRecord]) -> Option<&'a TaskRecord> {
        match self {
            Self::CompletedCount(n) => nth_matching(completed, n, |_| true),
            Self::HighPriorityCount(n) => {
                nth_matching(completed, n, |task| task.priority == Priority::High)
            }
            Self::CompletedBeforeDue => completed
                .iter()
                .copied()
                .find(|task| task.completed_on_time()),
        }
    }
}

fn nth_matching<'a>(
    completed: &[&'a TaskRecord],
    ordinal: usize,
    predicate: impl Fn(&TaskRecord) -> bool,
) -> Option<&'a TaskRecord> {
    let index = ordinal.checked_sub(1)?;
    completed
        .iter()
        .copied()
        .filter(|task| predicate(*task))
        .nth(index)
}

/// Static descriptor for one catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AchievementRule {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub rule: UnlockRule,
}

impl AchievementRule {
    pub fn evaluate(&self, completed: &[&TaskRecord]) -> Achievement {
        let qualifying = self.rule.qualifying_task(completed);
        Achievement {
            id: self.id,
            title: self.title,
            description: self.description,
            icon: self.icon,
            unlocked: qualifying.is_some(),
            unlocked_at: qualifying.and_then(|task| task.completed_at),
        }
    }
}

/// Achievement catalog in display order.
pub const ACHIEVEMENT_CATALOG: &[AchievementRule] = &[
    AchievementRule {
        id: "first-task",
        title: "Getting Started",
        description: "Complete your first task",
        icon: "CheckCircle",
        rule: UnlockRule::CompletedCount(1),
    },
    AchievementRule {
        id: "task-master-5",
        title: "Task Master",
        description: "Complete 5 tasks",
        icon: "Trophy",
        rule: UnlockRule::CompletedCount(5),
    },
    AchievementRule {
        id: "task-master-10",
        title: "Productivity Pro",
        description: "Complete 10 tasks",
        icon: "Star",
        rule: UnlockRule::CompletedCount(10),
    },
    AchievementRule {
        id: "task-master-25",
        title: "Unstoppable",
        description: "Complete 25 tasks",
        icon: "Zap",
        rule: UnlockRule::CompletedCount(25),
    },
    AchievementRule {
        id: "high-priority-warrior",
        title: "Priority Warrior",
        description: "Complete 5 high-priority tasks",
        icon: "AlertCircle",
        rule: UnlockRule::HighPriorityCount(5),
    },
    AchievementRule {
        id: "early-bird",
        title: "Early Bird",
        description: "Complete a task before its due date",
        icon: "Sunrise",
        rule: UnlockRule::CompletedBeforeDue,
    },
];

/// Evaluates the whole catalog for one snapshot.
///
/// `_tasks` is the full task list; the current catalog only inspects the
/// completed subset. `completed` should come from a stable source order
/// (store order) for ordinal unlock stamps to be meaningful.
pub fn evaluate_achievements(_tasks: &[TaskRecord], completed: &[&TaskRecord]) -> Vec<Achievement> {
    ACHIEVEMENT_CATALOG
        .iter()
        .map(|rule| rule.evaluate(completed))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{evaluate_achievements, UnlockRule, ACHIEVEMENT_CATALOG};
    use crate::model::achievement::Achievement;
    use crate::model::task::{Priority, TaskRecord};
    use crate::scoring::fixtures::{done_task, utc};

    fn completed_days(count: u32, priority: Priority) -> Vec<TaskRecord> {
        (1..=count)
            .map(|day| done_task(&format!("t{day}"), priority, utc(2025, 1, day, 9)))
            .collect()
    }

    fn find<'a>(achievements: &'a [Achievement], id: &str) -> &'a Achievement {
        achievements
            .iter()
            .find(|achievement| achievement.id == id)
            .unwrap()
    }

    #[test]
    fn catalog_order_is_stable() {
        let ids: Vec<_> = ACHIEVEMENT_CATALOG.iter().map(|rule| rule.id).collect();
        assert_eq!(
            ids,
            vec![
                "first-task",
                "task-master-5",
                "task-master-10",
                "task-master-25",
                "high-priority-warrior",
                "early-bird",
            ]
        );
    }

    #[test]
    fn nothing_unlocks_without_completions() {
        let achievements = evaluate_achievements(&[], &[]);
        assert_eq!(achievements.len(), ACHIEVEMENT_CATALOG.len());
        assert!(achievements
            .iter()
            .all(|achievement| !achievement.unlocked && achievement.unlocked_at.is_none()));
    }

    #[test]
    fn task_master_five_threshold_is_exact() {
        let four = completed_days(4, Priority::Low);
        let refs: Vec<_> = four.iter().collect();
        let achievements = evaluate_achievements(&four, &refs);
        assert!(!find(&achievements, "task-master-5").unlocked);
        assert_eq!(
            find(&achievements, "first-task").unlocked_at,
            Some(utc(2025, 1, 1, 9))
        );

        let five = completed_days(5, Priority::Low);
        let refs: Vec<_> = five.iter().collect();
        let achievements = evaluate_achievements(&five, &refs);
        let master = find(&achievements, "task-master-5");
        assert!(master.unlocked);
        assert_eq!(master.unlocked_at, Some(utc(2025, 1, 5, 9)));
    }

    #[test]
    fn ordinal_unlock_follows_supplied_order() {
        let tasks = completed_days(5, Priority::Low);
        let reversed: Vec<_> = tasks.iter().rev().collect();
        let achievements = evaluate_achievements(&tasks, &reversed);

        assert_eq!(
            find(&achievements, "first-task").unlocked_at,
            Some(utc(2025, 1, 5, 9))
        );
        assert_eq!(
            find(&achievements, "task-master-5").unlocked_at,
            Some(utc(2025, 1, 1, 9))
        );
    }

    #[test]
    fn high_priority_counts_only_high_tasks() {
        let mut tasks = completed_days(4, Priority::High);
        tasks.extend(completed_days(3, Priority::Medium));
        let refs: Vec<_> = tasks.iter().collect();
        assert!(!find(&evaluate_achievements(&tasks, &refs), "high-priority-warrior").unlocked);

        tasks.push(done_task("late-high", Priority::High, utc(2025, 2, 1, 9)));
        let refs: Vec<_> = tasks.iter().collect();
        let achievements = evaluate_achievements(&tasks, &refs);
        let warrior = find(&achievements, "high-priority-warrior");
        assert!(warrior.unlocked);
        assert_eq!(warrior.unlocked_at, Some(utc(2025, 2, 1, 9)));
    }

    #[test]
    fn early_bird_picks_first_on_time_task() {
        let mut late = done_task("late", Priority::Low, utc(2025, 1, 12, 9));
        late.due_date = Some(utc(2025, 1, 10, 0));
        let mut on_time = done_task("on-time", Priority::Low, utc(2025, 1, 9, 9));
        on_time.due_date = Some(utc(2025, 1, 10, 0));
        let mut also_on_time = done_task("also", Priority::Low, utc(2025, 1, 3, 9));
        also_on_time.due_date = Some(utc(2025, 1, 4, 0));

        let tasks = vec![late, on_time, also_on_time];
        let refs: Vec<_> = tasks.iter().collect();
        let early_bird = find(&evaluate_achievements(&tasks, &refs), "early-bird").clone();
        assert!(early_bird.unlocked);
        assert_eq!(early_bird.unlocked_at, Some(utc(2025, 1, 9, 9)));
    }

    #[test]
    fn early_bird_stays_locked_without_on_time_tasks() {
        let mut late = done_task("late", Priority::Low, utc(2025, 1, 12, 9));
        late.due_date = Some(utc(2025, 1, 10, 0));
        let no_deadline = done_task("free", Priority::Low, utc(2025, 1, 1, 9));

        let tasks = vec![late, no_deadline];
        let refs: Vec<_> = tasks.iter().collect();
        let early_bird = find(&evaluate_achievements(&tasks, &refs), "early-bird").clone();
        assert!(!early_bird.unlocked);
        assert_eq!(early_bird.unlocked_at, None);
    }

    #[test]
    fn unlock_without_stamp_keeps_unlocked_flag() {
        let mut task = done_task("legacy", Priority::Low, utc(2025, 1, 1, 9));
        task.completed_at = None;
        let tasks = vec![task];
        let refs: Vec<_> = tasks.iter().collect();
        let first = find(&evaluate_achievements(&tasks, &refs), "first-task").clone();

        assert!(first.unlocked);
        assert_eq!(first.unlocked_at, None);
    }

    #[test]
    fn zero_threshold_never_qualifies() {
        let tasks = completed_days(3, Priority::High);
        let refs: Vec<_> = tasks.iter().collect();
        assert!(UnlockRule::CompletedCount(0).qualifying_task(&refs).is_none());
    }

    #[test]
    fn early_bird_deadline_is_inclusive() {
        let mut exact = done_task("exact", Priority::Low, utc(2025, 1, 10, 0));
        exact.due_date = exact.completed_at;
        let tasks = vec![exact];
        let refs: Vec<_> = tasks.iter().collect();
        let early_bird = find(&evaluate_achievements(&tasks, &refs), "early-bird").clone();

        assert!(early_bird.unlocked);
        assert_eq!(early_bird.unlocked_at, Some(utc(2025, 1, 10, 0)));
    }

    #[test]
    fn higher_count_badges_need_the_full_count() {
        let nine = completed_days(9, Priority::Low);
        let refs: Vec<_> = nine.iter().collect();
        assert!(!find(&evaluate_achievements(&nine, &refs), "task-master-10").unlocked);

        let ten = completed_days(10, Priority::Low);
        let refs: Vec<_> = ten.iter().collect();
        let pro = find(&evaluate_achievements(&ten, &refs), "task-master-10").clone();
        assert!(pro.unlocked);
        assert_eq!(pro.unlocked_at, Some(utc(2025, 1, 10, 9)));

        let twenty_four = completed_days(24, Priority::Low);
        let refs: Vec<_> = twenty_four.iter().collect();
        let achievements = evaluate_achievements(&twenty_four, &refs);
        assert!(find(&achievements, "task-master-10").unlocked);
        assert!(!find(&achievements, "task-master-25").unlocked);
        assert_eq!(find(&achievements, "task-master-25").unlocked_at, None);

        let twenty_five = completed_days(25, Priority::Low);
        let refs: Vec<_> = twenty_five.iter().collect();
        let unstoppable =
            find(&evaluate_achievements(&twenty_five, &refs), "task-master-25").clone();
        assert!(unstoppable.unlocked);
        assert_eq!(unstoppable.unlocked_at, Some(utc(2025, 1, 25, 9)));
    }
}

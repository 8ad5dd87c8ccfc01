//! Aggregate statistics views.
//!
//! # Invariants
//! - Values here are recomputed from a task snapshot on demand.
//! - Serialized field names are camelCase to match the presentation contract.

use crate::model::achievement::Achievement;
use crate::model::task::{Category, Priority};
use serde::Serialize;

/// Summary of a user's task history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub points: u32,
    pub level: u32,
    pub points_to_next_level: u32,
    pub streak: u32,
    /// Full catalog in display order.
    pub achievements: Vec<Achievement>,
}

impl UserStats {
    /// Looks up one achievement by catalog key.
    pub fn achievement(&self, id: &str) -> Option<&Achievement> {
        self.achievements.iter().find(|achievement| achievement.id == id)
    }

    pub fn unlocked_count(&self) -> usize {
        self.achievements
            .iter()
            .filter(|achievement| achievement.unlocked)
            .count()
    }
}

/// Progress inside the current level, for progress-bar style displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelProgress {
    pub level: u32,
    pub points_into_level: u32,
    pub points_to_next_level: u32,
    /// Whole percent in `0..=99`.
    pub percent: u32,
}

/// Category/priority distribution over all tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsBreakdown {
    /// Every category in display order, zero counts included.
    pub by_category: Vec<(Category, usize)>,
    /// Every priority in display order (high first), zero counts included.
    pub by_priority: Vec<(Priority, usize)>,
    /// Completed share of all tasks, rounded down. Zero for no tasks.
    pub completion_percent: u32,
}

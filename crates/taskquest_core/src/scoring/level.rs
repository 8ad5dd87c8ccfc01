//! Level derivation from cumulative points.

use crate::model::stats::LevelProgress;

/// Width of one level band.
pub const POINTS_PER_LEVEL: u32 = 100;

/// 1-indexed level: `points / 100 + 1`.
pub fn calculate_level(points: u32) -> u32 {
    points / POINTS_PER_LEVEL + 1
}

/// Points still needed to reach the next level band.
///
/// Equal to `calculate_level(points) * 100 - points`, written so it cannot
/// overflow near `u32::MAX`. Always in `1..=100`.
pub fn points_to_next_level(points: u32) -> u32 {
    POINTS_PER_LEVEL - points % POINTS_PER_LEVEL
}

pub fn level_progress(points: u32) -> LevelProgress {
    let points_into_level = points % POINTS_PER_LEVEL;
    LevelProgress {
        level: calculate_level(points),
        points_into_level,
        points_to_next_level: points_to_next_level(points),
        percent: points_into_level * 100 / POINTS_PER_LEVEL,
    }
}

//! Core domain logic for TaskQuest.
//!
//! The `scoring` module is the pure gamification engine; `repo`, `service`
//! and `wire` are the collaborators that feed it task snapshots.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod scoring;
pub mod service;
pub mod wire;

pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::achievement::Achievement;
pub use model::stats::{LevelProgress, StatsBreakdown, UserStats};
pub use model::task::{Category, Priority, TaskId, TaskRecord, TaskValidationError};
pub use repo::task_repo::{RepoError, RepoResult, SqliteTaskRepository, TaskListQuery, TaskRepository};
pub use scoring::{
    calculate_level, calculate_points, calculate_streak, compute_breakdown, compute_stats,
    evaluate_achievements, level_progress, points_to_next_level, Clock, FixedClock, SystemClock,
};
pub use service::task_service::{NewTask, ServiceResult, TaskPatch, TaskService, TaskServiceError};
pub use wire::{decode_task, decode_tasks, encode_stats, encode_tasks, WireError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

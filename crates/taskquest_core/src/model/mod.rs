//! Domain model for tasks and their derived gamification views.
//!
//! # Responsibility
//! - Define canonical data structures consumed by the scoring engine.
//! - Keep transport-facing field naming in one place.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - `completed_at` is present if and only if `completed` is true.
//! - Achievements and stats are derived values and are never persisted.

pub mod achievement;
pub mod stats;
pub mod task;

//! Task record domain model.
//!
//! # Responsibility
//! - Define the canonical task record read by scoring and persisted by repo.
//! - Provide completion lifecycle helpers and validation.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `completed_at` is `Some` exactly when `completed` is true.
//! - `title` is never empty after trimming.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Opaque stable identifier for one task.
///
/// Generated ids are UUID v4 strings; ids imported from other stores are
/// kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Creates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wraps an externally issued identifier.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Task urgency used by point bonuses and the priority achievement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Display order used by distribution views.
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(UnknownVariant::new("priority", other)),
        }
    }
}

/// User-facing grouping for tasks. Not used by scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Work,
    #[default]
    Personal,
    Health,
    Learning,
    Other,
}

impl Category {
    /// Display order used by breakdown views.
    pub const ALL: [Category; 5] = [
        Category::Work,
        Category::Personal,
        Category::Health,
        Category::Learning,
        Category::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Personal => "personal",
            Self::Health => "health",
            Self::Learning => "learning",
            Self::Other => "other",
        }
    }
}

impl FromStr for Category {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "work" => Ok(Self::Work),
            "personal" => Ok(Self::Personal),
            "health" => Ok(Self::Health),
            "learning" => Ok(Self::Learning),
            "other" => Ok(Self::Other),
            other => Err(UnknownVariant::new("category", other)),
        }
    }
}

/// Parse failure for a closed string enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub field: &'static str,
    pub value: String,
}

impl UnknownVariant {
    fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_string(),
        }
    }
}

impl Display for UnknownVariant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown {} `{}`", self.field, self.value)
    }
}

impl Error for UnknownVariant {}

/// Validation failures for task records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyId,
    EmptyTitle,
    /// `completed` and presence of `completed_at` disagree.
    CompletionMismatch {
        completed: bool,
        has_completed_at: bool,
    },
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "task id cannot be empty"),
            Self::EmptyTitle => write!(f, "task title cannot be empty"),
            Self::CompletionMismatch {
                completed,
                has_completed_at,
            } => write!(
                f,
                "completed ({completed}) must match presence of completed_at ({has_completed_at})"
            ),
        }
    }
}

impl Error for TaskValidationError {}

/// Canonical task record.
///
/// Deserialization goes through the lenient wire shape in [`crate::wire`],
/// which normalizes field names and empty optional dates before validating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "crate::wire::TaskDocument")]
pub struct TaskRecord {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    /// Absent means no deadline.
    pub due_date: Option<DateTime<Utc>>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    /// Set exactly when `completed` is true.
    pub completed_at: Option<DateTime<Utc>>,
}

impl TaskRecord {
    /// Creates an open task with a generated id and default classification.
    pub fn new(title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self::with_id(TaskId::generate(), title, created_at)
    }

    /// Creates an open task with a caller-provided id.
    ///
    /// Used by import paths where identity already exists externally. Does
    /// not validate; call [`TaskRecord::validate`] before persisting.
    pub fn with_id(id: TaskId, title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            category: Category::default(),
            priority: Priority::default(),
            due_date: None,
            completed: false,
            created_at,
            completed_at: None,
        }
    }

    /// Marks the task completed at `at`.
    pub fn mark_completed(&mut self, at: DateTime<Utc>) {
        self.completed = true;
        self.completed_at = Some(at);
    }

    /// Returns the task to the open state and clears its completion stamp.
    pub fn reopen(&mut self) {
        self.completed = false;
        self.completed_at = None;
    }

    /// Whether a recorded completion landed on or before the deadline.
    ///
    /// Tasks without a deadline or without a completion stamp never qualify.
    pub fn completed_on_time(&self) -> bool {
        match (self.completed_at, self.due_date) {
            (Some(completed_at), Some(due_date)) => completed_at <= due_date,
            _ => false,
        }
    }

    /// Checks record invariants.
    ///
    /// # Errors
    /// - `EmptyId` / `EmptyTitle` for blank identity or title.
    /// - `CompletionMismatch` when `completed` and `completed_at` disagree.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.is_empty() {
            return Err(TaskValidationError::EmptyId);
        }
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        let has_completed_at = self.completed_at.is_some();
        if self.completed != has_completed_at {
            return Err(TaskValidationError::CompletionMismatch {
                completed: self.completed,
                has_completed_at,
            });
        }
        Ok(())
    }
}

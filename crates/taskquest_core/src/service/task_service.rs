//! Task use-case service.
//!
//! # Responsibility
//! - Provide CRUD entry points that own completion stamping.
//! - Produce stats snapshots from the store through the scoring engine.
//!
//! # Invariants
//! - Any write carrying `completed` re-stamps `completed_at` from the clock
//!   (`Some(now)` when true, `None` when false), even if unchanged.
//! - Timestamps written here are truncated to milliseconds to match storage
//!   precision.
//! - Stats are computed over the store's list order.

use crate::model::stats::{StatsBreakdown, UserStats};
use crate::model::task::{Category, Priority, TaskId, TaskRecord, TaskValidationError};
use crate::repo::task_repo::{RepoError, TaskListQuery, TaskRepository};
use crate::scoring::{compute_breakdown, compute_stats, Clock};
use chrono::{DateTime, SubsecRound, Utc};
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, TaskServiceError>;

/// Service error for task use-cases.
#[derive(Debug)]
pub enum TaskServiceError {
    /// Request would produce an invalid record.
    InvalidInput(TaskValidationError),
    /// Target task does not exist.
    TaskNotFound(TaskId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(err) => write!(f, "invalid task input: {err}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidInput(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::TaskNotFound(_) => None,
        }
    }
}

impl From<TaskValidationError> for TaskServiceError {
    fn from(value: TaskValidationError) -> Self {
        Self::InvalidInput(value)
    }
}

impl From<RepoError> for TaskServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::TaskNotFound(id),
            RepoError::Validation(err) => Self::InvalidInput(err),
            other => Self::Repo(other),
        }
    }
}

/// Request model for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
    /// Creating an already-completed task stamps `completed_at = now`.
    pub completed: bool,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            category: Category::default(),
            priority: Priority::default(),
            due_date: None,
            completed: false,
        }
    }
}

/// Partial update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    /// `Some(None)` clears the deadline.
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub completed: Option<bool>,
}

/// Use-case service over a task repository and an evaluation clock.
pub struct TaskService<R: TaskRepository, C: Clock> {
    repo: R,
    clock: C,
}

impl<R: TaskRepository, C: Clock> TaskService<R, C> {
    pub fn new(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Creates and persists a new task with a generated id.
    pub fn create_task(&self, request: NewTask) -> ServiceResult<TaskRecord> {
        let now = self.now_utc();
        let mut task = TaskRecord::new(request.title.trim(), now);
        task.description = request.description;
        task.category = request.category;
        task.priority = request.priority;
        task.due_date = request.due_date;
        if request.completed {
            task.mark_completed(now);
        }
        task.validate()?;

        self.repo.create_task(&task)?;
        info!(
            "event=task_create module=service status=ok task_id={} completed={}",
            task.id, task.completed
        );
        Ok(task)
    }

    /// Applies a partial update and returns the stored result.
    ///
    /// # Errors
    /// - `TaskNotFound` when `id` is unknown.
    /// - `InvalidInput` when the patched record fails validation.
    pub fn update_task(&self, id: &TaskId, patch: TaskPatch) -> ServiceResult<TaskRecord> {
        let mut task = self.get_task(id)?;

        if let Some(title) = patch.title {
            task.title = title.trim().to_string();
        }
        if let Some(description) = patch.description {
            task.description = description;
        }
        if let Some(category) = patch.category {
            task.category = category;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }
        if let Some(completed) = patch.completed {
            if completed {
                task.mark_completed(self.now_utc());
            } else {
                task.reopen();
            }
        }
        task.validate()?;

        self.repo.update_task(&task)?;
        info!(
            "event=task_update module=service status=ok task_id={} completed={}",
            task.id, task.completed
        );
        Ok(task)
    }

    pub fn set_completed(&self, id: &TaskId, completed: bool) -> ServiceResult<TaskRecord> {
        self.update_task(
            id,
            TaskPatch {
                completed: Some(completed),
                ..TaskPatch::default()
            },
        )
    }

    /// Flips completion state.
    pub fn toggle_task(&self, id: &TaskId) -> ServiceResult<TaskRecord> {
        let task = self.get_task(id)?;
        self.set_completed(id, !task.completed)
    }

    pub fn delete_task(&self, id: &TaskId) -> ServiceResult<()> {
        self.repo.delete_task(id)?;
        info!("event=task_delete module=service status=ok task_id={id}");
        Ok(())
    }

    pub fn get_task(&self, id: &TaskId) -> ServiceResult<TaskRecord> {
        self.repo
            .get_task(id)?
            .ok_or_else(|| TaskServiceError::TaskNotFound(id.clone()))
    }

    pub fn list_tasks(&self, query: &TaskListQuery) -> ServiceResult<Vec<TaskRecord>> {
        Ok(self.repo.list_tasks(query)?)
    }

    /// Computes the gamification summary over every stored task.
    pub fn user_stats(&self) -> ServiceResult<UserStats> {
        let tasks = self.repo.list_tasks(&TaskListQuery::default())?;
        let stats = compute_stats(&tasks, self.clock.now());
        info!(
            "event=stats_compute module=service status=ok total={} completed={} points={} level={} streak={} unlocked={}",
            stats.total_tasks,
            stats.completed_tasks,
            stats.points,
            stats.level,
            stats.streak,
            stats.unlocked_count()
        );
        Ok(stats)
    }

    pub fn stats_breakdown(&self) -> ServiceResult<StatsBreakdown> {
        let tasks = self.repo.list_tasks(&TaskListQuery::default())?;
        let breakdown = compute_breakdown(&tasks);
        debug!(
            "event=stats_breakdown module=service status=ok total={} completion_percent={}",
            tasks.len(),
            breakdown.completion_percent
        );
        Ok(breakdown)
    }

    fn now_utc(&self) -> DateTime<Utc> {
        self.clock.now().with_timezone(&Utc).trunc_subsecs(3)
    }
}

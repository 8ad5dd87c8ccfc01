//! Task repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the `tasks` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `TaskRecord::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - List order is `created_at DESC, id ASC`; scoring relies on it being
//!   stable between calls.

use crate::db::DbError;
use crate::model::task::{Category, Priority, TaskId, TaskRecord, TaskValidationError};
use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const TASK_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    category,
    priority,
    due_date,
    completed,
    completed_at,
    created_at
FROM tasks";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for task persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(TaskValidationError),
    Db(DbError),
    NotFound(TaskId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted task data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<TaskValidationError> for RepoError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Filter and pagination options for listing tasks.
#[derive(Debug, Clone, Default)]
pub struct TaskListQuery {
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub completed: Option<bool>,
    /// Case-insensitive substring match on title. Blank means no filter.
    pub title_contains: Option<String>,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for task CRUD operations.
pub trait TaskRepository {
    fn create_task(&self, task: &TaskRecord) -> RepoResult<TaskId>;
    fn update_task(&self, task: &TaskRecord) -> RepoResult<()>;
    fn get_task(&self, id: &TaskId) -> RepoResult<Option<TaskRecord>>;
    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<TaskRecord>>;
    /// Permanently removes a task.
    fn delete_task(&self, id: &TaskId) -> RepoResult<()>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, task: &TaskRecord) -> RepoResult<TaskId> {
        task.validate()?;

        self.conn.execute(
            "INSERT INTO tasks (
                id,
                title,
                description,
                category,
                priority,
                due_date,
                completed,
                completed_at,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                task.id.as_str(),
                task.title.as_str(),
                task.description.as_str(),
                task.category.as_str(),
                task.priority.as_str(),
                task.due_date.map(to_epoch_ms),
                bool_to_int(task.completed),
                task.completed_at.map(to_epoch_ms),
                to_epoch_ms(task.created_at),
            ],
        )?;

        Ok(task.id.clone())
    }

    fn update_task(&self, task: &TaskRecord) -> RepoResult<()> {
        task.validate()?;

        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                title = ?1,
                description = ?2,
                category = ?3,
                priority = ?4,
                due_date = ?5,
                completed = ?6,
                completed_at = ?7,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?8;",
            params![
                task.title.as_str(),
                task.description.as_str(),
                task.category.as_str(),
                task.priority.as_str(),
                task.due_date.map(to_epoch_ms),
                bool_to_int(task.completed),
                task.completed_at.map(to_epoch_ms),
                task.id.as_str(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(task.id.clone()));
        }

        Ok(())
    }

    fn get_task(&self, id: &TaskId) -> RepoResult<Option<TaskRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.as_str()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }

        Ok(None)
    }

    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<TaskRecord>> {
        let mut sql = format!("{TASK_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(category) = query.category {
            sql.push_str(" AND category = ?");
            bind_values.push(Value::Text(category.as_str().to_string()));
        }

        if let Some(priority) = query.priority {
            sql.push_str(" AND priority = ?");
            bind_values.push(Value::Text(priority.as_str().to_string()));
        }

        if let Some(completed) = query.completed {
            sql.push_str(" AND completed = ?");
            bind_values.push(Value::Integer(bool_to_int(completed)));
        }

        if let Some(needle) = query
            .title_contains
            .as_deref()
            .map(str::trim)
            .filter(|needle| !needle.is_empty())
        {
            sql.push_str(" AND instr(lower(title), lower(?)) > 0");
            bind_values.push(Value::Text(needle.to_string()));
        }

        sql.push_str(" ORDER BY created_at DESC, id ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut tasks = Vec::new();

        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    fn delete_task(&self, id: &TaskId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1;", [id.as_str()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id.clone()));
        }

        Ok(())
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<TaskRecord> {
    let category_text: String = row.get("category")?;
    let category = Category::from_str(&category_text).map_err(|err| {
        RepoError::InvalidData(format!("{err} in tasks.category"))
    })?;

    let priority_text: String = row.get("priority")?;
    let priority = Priority::from_str(&priority_text).map_err(|err| {
        RepoError::InvalidData(format!("{err} in tasks.priority"))
    })?;

    let completed = match row.get::<_, i64>("completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid completed value `{other}` in tasks.completed"
            )));
        }
    };

    let task = TaskRecord {
        id: TaskId::new(row.get::<_, String>("id")?),
        title: row.get("title")?,
        description: row.get("description")?,
        category,
        priority,
        due_date: optional_from_epoch_ms("due_date", row.get("due_date")?)?,
        completed,
        completed_at: optional_from_epoch_ms("completed_at", row.get("completed_at")?)?,
        created_at: from_epoch_ms("created_at", row.get("created_at")?)?,
    };
    task.validate()
        .map_err(|err| RepoError::InvalidData(format!("{err} in tasks row `{}`", task.id)))?;
    Ok(task)
}

fn to_epoch_ms(value: DateTime<Utc>) -> i64 {
    value.timestamp_millis()
}

fn from_epoch_ms(column: &str, value: i64) -> RepoResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(value).ok_or_else(|| {
        RepoError::InvalidData(format!("out-of-range timestamp `{value}` in tasks.{column}"))
    })
}

fn optional_from_epoch_ms(column: &str, value: Option<i64>) -> RepoResult<Option<DateTime<Utc>>> {
    value.map(|ms| from_epoch_ms(column, ms)).transpose()
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

//! JSON transport boundary for task documents and stats.
//!
//! # Responsibility
//! - Translate REST-style task documents into validated `TaskRecord`s.
//! - Normalize optional timestamps: absent, `null`, `""` all mean `None`.
//! - Encode records and stats for transport.
//!
//! # Invariants
//! - Unparseable timestamps are rejected, never coerced.
//! - Every decoded record has passed `TaskRecord::validate()`.
//! - Date-only strings (`YYYY-MM-DD`) denote midnight UTC.

use crate::model::stats::UserStats;
use crate::model::task::{Category, Priority, TaskId, TaskRecord, TaskValidationError};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Read;

pub type WireResult<T> = Result<T, WireError>;

/// Decoding/encoding failures at the transport boundary.
#[derive(Debug)]
pub enum WireError {
    Json(serde_json::Error),
    MissingField(&'static str),
    InvalidTimestamp { field: &'static str, value: String },
    Validation(TaskValidationError),
}

impl Display for WireError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "{err}"),
            Self::MissingField(field) => write!(f, "missing required field `{field}`"),
            Self::InvalidTimestamp { field, value } => {
                write!(f, "invalid timestamp `{value}` in `{field}`")
            }
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for WireError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::MissingField(_) | Self::InvalidTimestamp { .. } => None,
        }
    }
}

impl From<serde_json::Error> for WireError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<TaskValidationError> for WireError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Lenient inbound task shape.
///
/// Accepts both the store's snake_case names (`_id`, `due_date`, ...) and
/// the camelCase names used by presentation clients.
#[derive(Debug, Deserialize)]
pub struct TaskDocument {
    #[serde(alias = "_id")]
    id: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    category: Option<Category>,
    #[serde(default)]
    priority: Option<Priority>,
    #[serde(default, alias = "dueDate")]
    due_date: Option<String>,
    #[serde(default)]
    completed: Option<bool>,
    #[serde(default, alias = "createdAt")]
    created_at: Option<String>,
    #[serde(default, alias = "completedAt")]
    completed_at: Option<String>,
}

impl TryFrom<TaskDocument> for TaskRecord {
    type Error = WireError;

    fn try_from(document: TaskDocument) -> Result<Self, Self::Error> {
        let created_at = parse_optional_timestamp("created_at", document.created_at.as_deref())?
            .ok_or(WireError::MissingField("created_at"))?;

        let record = TaskRecord {
            id: TaskId::new(document.id),
            title: document.title,
            description: document.description.unwrap_or_default(),
            category: document.category.unwrap_or_default(),
            priority: document.priority.unwrap_or_default(),
            due_date: parse_optional_timestamp("due_date", document.due_date.as_deref())?,
            completed: document.completed.unwrap_or(false),
            created_at,
            completed_at: parse_optional_timestamp(
                "completed_at",
                document.completed_at.as_deref(),
            )?,
        };
        record.validate()?;
        Ok(record)
    }
}

/// Parses an optional wire timestamp.
///
/// Blank input is `None`. Accepts RFC 3339 or a bare `YYYY-MM-DD` date.
pub fn parse_optional_timestamp(
    field: &'static str,
    value: Option<&str>,
) -> WireResult<Option<DateTime<Utc>>> {
    let Some(raw) = value else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(Some(Utc.from_utc_datetime(&date.and_time(NaiveTime::default()))));
    }

    Err(WireError::InvalidTimestamp {
        field,
        value: trimmed.to_string(),
    })
}

/// Decodes one task document.
///
/// Syntax and shape errors come back as `Json`; timestamp and validation
/// failures keep their own variants.
pub fn decode_task(json: &str) -> WireResult<TaskRecord> {
    let document: TaskDocument = serde_json::from_str(json)?;
    TaskRecord::try_from(document)
}

/// Decodes a JSON array of task documents, preserving order.
pub fn decode_tasks(json: &str) -> WireResult<Vec<TaskRecord>> {
    into_records(serde_json::from_str(json)?)
}

/// Reader variant of [`decode_tasks`].
pub fn decode_tasks_from_reader(reader: impl Read) -> WireResult<Vec<TaskRecord>> {
    into_records(serde_json::from_reader(reader)?)
}

fn into_records(documents: Vec<TaskDocument>) -> WireResult<Vec<TaskRecord>> {
    documents.into_iter().map(TaskRecord::try_from).collect()
}

pub fn encode_tasks(tasks: &[TaskRecord]) -> WireResult<String> {
    Ok(serde_json::to_string_pretty(tasks)?)
}

pub fn encode_stats(stats: &UserStats) -> WireResult<String> {
    Ok(serde_json::to_string_pretty(stats)?)
}

#[cfg(test)]
mod tests {
    use super::{parse_optional_timestamp, WireError};
    use chrono::{TimeZone, Utc};

    #[test]
    fn blank_values_normalize_to_none() {
        assert_eq!(parse_optional_timestamp("due_date", None).unwrap(), None);
        assert_eq!(parse_optional_timestamp("due_date", Some("")).unwrap(), None);
        assert_eq!(parse_optional_timestamp("due_date", Some("  ")).unwrap(), None);
    }

    #[test]
    fn date_only_means_midnight_utc() {
        let parsed = parse_optional_timestamp("due_date", Some("2025-01-10")).unwrap();
        assert_eq!(parsed, Some(Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap()));
    }

    #[test]
    fn offsets_are_converted_to_utc() {
        let parsed =
            parse_optional_timestamp("completed_at", Some("2025-01-10T02:30:00.000+02:00"))
                .unwrap();
        assert_eq!(parsed, Some(Utc.with_ymd_and_hms(2025, 1, 10, 0, 30, 0).unwrap()));
    }

    #[test]
    fn garbage_is_rejected_with_field_name() {
        let err = parse_optional_timestamp("due_date", Some("next tuesday")).unwrap_err();
        match err {
            WireError::InvalidTimestamp { field, value } => {
                assert_eq!(field, "due_date");
                assert_eq!(value, "next tuesday");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

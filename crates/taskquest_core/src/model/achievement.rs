//! Achievement view model.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One catalog entry with its unlock state for the current snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    /// Stable catalog key, e.g. `first-task`.
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    /// Opaque icon key for the presentation layer.
    pub icon: &'static str,
    pub unlocked: bool,
    /// Completion stamp of the task that satisfied the rule.
    pub unlocked_at: Option<DateTime<Utc>>,
}

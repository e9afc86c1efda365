//! Task records.
//!
//! Defines the [`Task`] type persisted in the store and the [`TaskStatus`]
//! lifecycle. Due times are naive local timestamps: the operator types
//! `YYYY-MM-DD HH:MM` and the store keeps an ISO-8601 string. The string is
//! parsed per record at due-check time, so one unreadable timestamp cannot
//! poison the rest of the collection.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Due-time format accepted from the command interface.
pub const DUE_INPUT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Due-time format written to the store (ISO-8601, no timezone).
pub(crate) const DUE_STORE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Lifecycle state of a task.
///
/// Tasks are created pending and become completed either through an explicit
/// `complete` command or when the reminder loop delivers their notification.
/// Deletion removes the record outright; there is no tombstone state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Not yet done; eligible for reminder delivery once due.
    #[default]
    Pending,
    /// Done; ignored by the reminder loop.
    Completed,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// A single tracked task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Identifier, unique within the store. Allocated from the store's
    /// persisted counter and never reused after a delete.
    pub id: u64,
    /// Free-form description.
    pub description: String,
    /// ISO-8601 due timestamp (naive local time).
    pub due: String,
    /// Free-text priority label, e.g. "high" / "medium" / "low".
    pub priority: String,
    /// Lifecycle state.
    pub status: TaskStatus,
}

impl Task {
    /// Create a new pending task.
    pub fn new(
        id: u64,
        description: impl Into<String>,
        due: NaiveDateTime,
        priority: impl Into<String>,
    ) -> Self {
        Self {
            id,
            description: description.into(),
            due: due.format(DUE_STORE_FORMAT).to_string(),
            priority: priority.into(),
            status: TaskStatus::Pending,
        }
    }

    /// Parse the stored due timestamp.
    pub fn due_at(&self) -> Result<NaiveDateTime, chrono::ParseError> {
        self.due.parse::<NaiveDateTime>()
    }

    /// Returns `true` while the task awaits completion.
    pub fn is_pending(&self) -> bool {
        self.status == TaskStatus::Pending
    }
}

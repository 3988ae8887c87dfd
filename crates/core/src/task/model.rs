//! Task model definitions

use std::fmt;
use std::ops::RangeInclusive;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Format of every due date accepted or written by this crate
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Advisory priority range for work tasks
pub const PRIORITY_RANGE: RangeInclusive<i64> = 1..=5;

/// Parse a `YYYY-MM-DD` due date
pub fn parse_due_date(raw: &str) -> Result<NaiveDate> {
    // chrono skips whitespace and accepts a sign before numeric fields
    let digits_and_dashes = raw.bytes().all(|b| b.is_ascii_digit() || b == b'-');
    if !digits_and_dashes || !raw.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(Error::InvalidDateFormat(raw.to_string()));
    }

    NaiveDate::parse_from_str(raw, DUE_DATE_FORMAT)
        .map_err(|_| Error::InvalidDateFormat(raw.to_string()))
}

/// Format a due date the way it is stored on disk
pub fn format_due_date(date: NaiveDate) -> String {
    date.format(DUE_DATE_FORMAT).to_string()
}

/// Reject priorities outside [`PRIORITY_RANGE`].
///
/// Work tasks accept any priority; callers that want the stricter rule
/// run the value through this first.
pub fn validate_priority(priority: i64) -> Result<i64> {
    if PRIORITY_RANGE.contains(&priority) {
        Ok(priority)
    } else {
        Err(Error::InvalidPriority(priority))
    }
}

/// Completion state of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Incomplete,
    Completed,
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Incomplete
    }
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Incomplete => "incomplete",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Variant-specific data of a task.
///
/// The variant is the discriminant written as `type` in the record format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskKind {
    Personal { category: String },
    Work { priority: i64 },
    Plain,
}

impl Default for TaskKind {
    fn default() -> Self {
        Self::Plain
    }
}

impl TaskKind {
    pub const PERSONAL: &'static str = "Personal";
    pub const WORK: &'static str = "Work";
    pub const PLAIN: &'static str = "Task";

    /// The `type` label used in the record format
    pub fn label(&self) -> &'static str {
        match self {
            Self::Personal { .. } => Self::PERSONAL,
            Self::Work { .. } => Self::WORK,
            Self::Plain => Self::PLAIN,
        }
    }
}

/// A single task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    pub status: TaskStatus,
    pub kind: TaskKind,
}

impl Task {
    /// Create a new plain, incomplete task.
    ///
    /// Fails with [`Error::InvalidDateFormat`] if `due_date` is not `YYYY-MM-DD`.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: &str,
    ) -> Result<Self> {
        Ok(Self {
            title: title.into(),
            description: description.into(),
            due_date: parse_due_date(due_date)?,
            status: TaskStatus::default(),
            kind: TaskKind::default(),
        })
    }

    /// Turn this into a personal task
    pub fn personal(mut self, category: impl Into<String>) -> Self {
        self.kind = TaskKind::Personal {
            category: category.into(),
        };
        self
    }

    /// Turn this into a work task
    pub fn work(mut self, priority: i64) -> Self {
        self.kind = TaskKind::Work { priority };
        self
    }

    /// Set the status
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn category(&self) -> Option<&str> {
        match &self.kind {
            TaskKind::Personal { category } => Some(category),
            _ => None,
        }
    }

    pub fn priority(&self) -> Option<i64> {
        match self.kind {
            TaskKind::Work { priority } => Some(priority),
            _ => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Replace the due date, leaving the task untouched on a bad date
    pub fn set_due_date(&mut self, due_date: &str) -> Result<()> {
        self.due_date = parse_due_date(due_date)?;
        Ok(())
    }

    /// Mark as completed. Completing twice is a no-op.
    pub fn mark_completed(&mut self) {
        self.status = TaskStatus::Completed;
    }
}

/// Human-readable form. Variant-specific fields are not shown.
impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Title: {}\nDescription: {}\nDue Date: {}\nStatus: {}",
            self.title,
            self.description,
            self.due_date.and_time(NaiveTime::default()),
            self.status
        )
    }
}

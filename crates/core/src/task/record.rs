//! On-disk record format
//!
//! A task file is a JSON array with one object per task:
//!
//! ```json
//! {"title": "...", "description": "...", "due_date": "YYYY-MM-DD",
//!  "status": "incomplete", "type": "Personal", "category": "home"}
//! ```
//!
//! `category` is only present for `"Personal"` and `priority` only for
//! `"Work"`. Plain tasks are written as `"Task"`; any unrecognized or absent
//! `type` reads back as a plain task.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::model::{format_due_date, Task, TaskKind, TaskStatus};
use crate::{Error, Result};

/// Keys every record must carry, whatever its type
const REQUIRED_KEYS: &[&str] = &["title", "description", "due_date", "status"];

/// Plain key-value form of a task. Field order is the key order on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub status: TaskStatus,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub task_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
}

impl TaskRecord {
    /// Read one record out of a parsed JSON value.
    ///
    /// Absent base keys are reported as [`Error::MissingField`]; anything
    /// else that does not fit the record shape is [`Error::MalformedData`].
    /// A `type` that is not a string counts as absent, and only the field
    /// of the selected variant is read.
    pub fn from_value(value: Value) -> Result<Self> {
        let mut map = match value {
            Value::Object(map) => map,
            other => {
                return Err(Error::MalformedData(format!(
                    "expected a task object, found {}",
                    json_kind(&other)
                )))
            }
        };

        if let Some(key) = REQUIRED_KEYS.iter().find(|key| !map.contains_key(**key)) {
            return Err(Error::MissingField(key.to_string()));
        }

        let task_type = match map.remove("type") {
            Some(Value::String(label)) => Some(label),
            _ => None,
        };
        let category = map.remove("category");
        let priority = map.remove("priority");

        let mut record: TaskRecord = serde_json::from_value(Value::Object(map))
            .map_err(|e| Error::MalformedData(e.to_string()))?;

        match task_type.as_deref() {
            Some(TaskKind::PERSONAL) => record.category = variant_field("category", category)?,
            Some(TaskKind::WORK) => record.priority = variant_field("priority", priority)?,
            _ => {}
        }
        record.task_type = task_type;
        Ok(record)
    }
}

/// Read a variant field; `null` is treated as absent
fn variant_field<T: DeserializeOwned>(key: &str, value: Option<Value>) -> Result<Option<T>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| Error::MalformedData(format!("{}: {}", key, e))),
    }
}

impl From<&Task> for TaskRecord {
    fn from(task: &Task) -> Self {
        let (category, priority) = match &task.kind {
            TaskKind::Personal { category } => (Some(category.clone()), None),
            TaskKind::Work { priority } => (None, Some(*priority)),
            TaskKind::Plain => (None, None),
        };

        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: format_due_date(task.due_date),
            status: task.status,
            task_type: Some(task.kind.label().to_string()),
            category,
            priority,
        }
    }
}

impl TryFrom<TaskRecord> for Task {
    type Error = Error;

    fn try_from(record: TaskRecord) -> Result<Self> {
        let kind = match record.task_type.as_deref() {
            Some(TaskKind::PERSONAL) => TaskKind::Personal {
                category: record
                    .category
                    .ok_or_else(|| Error::MissingField("category".to_string()))?,
            },
            Some(TaskKind::WORK) => TaskKind::Work {
                priority: record
                    .priority
                    .ok_or_else(|| Error::MissingField("priority".to_string()))?,
            },
            _ => TaskKind::Plain,
        };

        let mut task = Task::new(record.title, record.description, &record.due_date)?
            .with_status(record.status);
        task.kind = kind;
        Ok(task)
    }
}

impl Task {
    /// Convert to the on-disk record
    pub fn to_record(&self) -> TaskRecord {
        TaskRecord::from(self)
    }

    /// Build a task from an on-disk record, dispatching on its `type`
    pub fn from_record(record: TaskRecord) -> Result<Self> {
        Self::try_from(record)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

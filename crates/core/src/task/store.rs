//! In-memory task store with JSON file persistence
//!
//! The store owns an ordered list of tasks. Insertion order is the display
//! order, and positions handed to users are 1-based indices into it.

use std::path::Path;

use serde_json::Value;
use uuid::Uuid;

use super::model::Task;
use super::record::TaskRecord;
use crate::{Error, Result};

/// Ordered collection of tasks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a task at the end
    pub fn add(&mut self, task: Task) {
        tracing::debug!(title = %task.title, kind = task.kind.label(), "Adding task");
        self.tasks.push(task);
    }

    /// Remove the first task equal to `task` and return it
    pub fn remove(&mut self, task: &Task) -> Result<Task> {
        let index = self.index_of(task)?;
        tracing::debug!(title = %task.title, index, "Removing task");
        Ok(self.tasks.remove(index))
    }

    /// Change the due date of the first task equal to `task`
    pub fn update_due_date(&mut self, task: &Task, new_due_date: &str) -> Result<()> {
        let index = self.index_of(task)?;
        self.tasks[index].set_due_date(new_due_date)?;
        tracing::debug!(title = %task.title, due_date = new_due_date, "Updated due date");
        Ok(())
    }

    /// Mark the first task equal to `task` as completed
    pub fn mark_completed(&mut self, task: &Task) -> Result<()> {
        let index = self.index_of(task)?;
        self.tasks[index].mark_completed();
        tracing::debug!(title = %task.title, "Marked task completed");
        Ok(())
    }

    /// All tasks in store order
    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Look up a task by its 1-based position
    pub fn task_at(&self, position: usize) -> Option<&Task> {
        position.checked_sub(1).and_then(|index| self.tasks.get(index))
    }

    /// Write every task to `path` as a JSON array.
    ///
    /// The content goes to a temporary file next to `path` which is then
    /// renamed over it, so a failed save leaves the previous file intact.
    /// Missing parent directories are not created.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let records: Vec<TaskRecord> = self.tasks.iter().map(Task::to_record).collect();
        let content = serde_json::to_string_pretty(&records)
            .map_err(|e| Error::MalformedData(format!("Failed to serialize tasks: {}", e)))?;

        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let temp_path = parent.join(format!(".{}.tmp", Uuid::new_v4().as_hyphenated()));

        if let Err(err) = std::fs::write(&temp_path, content) {
            let _ = std::fs::remove_file(&temp_path);
            tracing::warn!(path = %temp_path.display(), error = %err, "Failed to write tasks");
            return Err(err.into());
        }

        if let Err(err) = std::fs::rename(&temp_path, path) {
            let _ = std::fs::remove_file(&temp_path);
            tracing::warn!(path = %path.display(), error = %err, "Failed to save tasks");
            return Err(err.into());
        }

        tracing::debug!(path = %path.display(), count = self.tasks.len(), "Saved tasks");
        Ok(())
    }

    /// Read a JSON array of tasks from `path` and append them.
    ///
    /// Existing tasks are kept, so loading the same file twice duplicates
    /// its tasks. Every record is converted before any is appended: on error
    /// the store is unchanged. Returns the number of tasks appended.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let value: Value = serde_json::from_str(&content)
            .map_err(|e| Error::MalformedData(format!("Failed to parse {}: {}", path.display(), e)))?;
        let Value::Array(entries) = value else {
            return Err(Error::MalformedData(format!(
                "Expected a JSON array of tasks in {}",
                path.display()
            )));
        };

        let loaded = entries
            .into_iter()
            .map(|entry| TaskRecord::from_value(entry).and_then(Task::from_record))
            .collect::<Result<Vec<_>>>()?;

        let count = loaded.len();
        self.tasks.extend(loaded);
        tracing::debug!(path = %path.display(), count, "Loaded tasks");
        Ok(count)
    }

    fn index_of(&self, task: &Task) -> Result<usize> {
        self.tasks.iter().position(|t| t == task).ok_or_else(|| {
            tracing::warn!(title = %task.title, "Task not in store");
            Error::TaskNotFound(task.title.clone())
        })
    }
}

impl<'a> IntoIterator for &'a TaskStore {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}

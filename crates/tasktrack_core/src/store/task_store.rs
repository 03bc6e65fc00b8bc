//! In-memory task list owner.
//!
//! # Responsibility
//! - Hold the ordered task list for one user session.
//! - Provide add/toggle/delete/clear operations and derived projections.
//! - Import/export the list through the task file codec.
//!
//! # Invariants
//! - Insertion order is preserved; new tasks are appended last.
//! - A failed operation leaves the list unchanged.
//! - Positions are only valid until the next delete/clear/import; callers
//!   holding positions must re-fetch them (prefer `TaskId`).

use crate::model::task::{NewTask, Task, TaskId, TaskLabel, TaskValidationError};
use crate::store::stats::TaskStats;
use crate::wire::task_file::{
    decode_tasks, encode_tasks, FormatError, DEADLINE_FORMAT, REMINDER_FORMAT,
};
use chrono::NaiveDate;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Placeholder shown for absent deadline/reminder values.
pub const EMPTY_CELL: &str = "-";

pub type StoreResult<T> = Result<T, StoreError>;

/// Error surface of `TaskStore` operations.
#[derive(Debug)]
pub enum StoreError {
    /// Rejected input on add.
    Validation(TaskValidationError),
    /// Position is outside `0..len`.
    Index { position: usize, len: usize },
    /// No task carries this id.
    NotFound(TaskId),
    /// Imported content does not match the task file shape.
    Format(FormatError),
    /// Task file could not be read or written.
    Io(std::io::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Index { position, len } => {
                write!(f, "task position {position} out of range for {len} task(s)")
            }
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::Format(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "task file I/O failed: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Format(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Index { .. } | Self::NotFound(_) => None,
        }
    }
}

impl From<TaskValidationError> for StoreError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<FormatError> for StoreError {
    fn from(value: FormatError) -> Self {
        Self::Format(value)
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Display row for one task, in list order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub position: usize,
    pub id: TaskId,
    pub title: String,
    pub done: bool,
    /// `YYYY-MM-DD` or [`EMPTY_CELL`].
    pub deadline: String,
    /// `HH:MM:SS` or [`EMPTY_CELL`].
    pub reminder: String,
    pub category: String,
    pub label: TaskLabel,
}

/// Owner of one session's ordered task list.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Current display position of `id`.
    pub fn position_of(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    /// Appends a new not-done task and returns its id.
    ///
    /// # Errors
    /// - `StoreError::Validation` when the title is blank.
    pub fn add(&mut self, input: NewTask) -> StoreResult<TaskId> {
        let task = match Task::new(input) {
            Ok(task) => task,
            Err(err) => {
                warn!("event=task_add module=store status=error error_code=validation");
                return Err(err.into());
            }
        };
        let id = task.id;
        self.tasks.push(task);
        info!(
            "event=task_add module=store status=ok total={}",
            self.tasks.len()
        );
        Ok(id)
    }

    /// Flips `done` for `id` and returns the new value.
    pub fn toggle(&mut self, id: TaskId) -> StoreResult<bool> {
        let position = self.position_of(id).ok_or(StoreError::NotFound(id))?;
        self.toggle_at(position)
    }

    /// Flips `done` at `position` and returns the new value.
    pub fn toggle_at(&mut self, position: usize) -> StoreResult<bool> {
        let len = self.tasks.len();
        let task = self
            .tasks
            .get_mut(position)
            .ok_or(StoreError::Index { position, len })?;
        task.done = !task.done;
        info!(
            "event=task_toggle module=store status=ok position={} done={}",
            position, task.done
        );
        Ok(task.done)
    }

    /// Removes the task with `id` and returns it.
    pub fn delete(&mut self, id: TaskId) -> StoreResult<Task> {
        let position = self.position_of(id).ok_or(StoreError::NotFound(id))?;
        self.delete_at(position)
    }

    /// Removes the task at `position`; later tasks shift down by one.
    pub fn delete_at(&mut self, position: usize) -> StoreResult<Task> {
        let len = self.tasks.len();
        if position >= len {
            return Err(StoreError::Index { position, len });
        }
        let removed = self.tasks.remove(position);
        info!(
            "event=task_delete module=store status=ok position={} total={}",
            position,
            self.tasks.len()
        );
        Ok(removed)
    }

    /// Removes every done task, preserving the order of the rest.
    ///
    /// Returns the number of removed tasks.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|task| !task.done);
        let removed = before - self.tasks.len();
        info!(
            "event=task_clear_completed module=store status=ok removed={} total={}",
            removed,
            self.tasks.len()
        );
        removed
    }

    /// Removes every task (user-initiated reset).
    pub fn clear_all(&mut self) -> usize {
        let removed = self.tasks.len();
        self.tasks.clear();
        info!("event=task_reset module=store status=ok removed={removed}");
        removed
    }

    pub fn stats(&self, as_of: NaiveDate) -> TaskStats {
        TaskStats::compute(&self.tasks, as_of)
    }

    /// Render projection of the list as of `as_of`.
    pub fn rows(&self, as_of: NaiveDate) -> Vec<TaskRow> {
        self.tasks
            .iter()
            .enumerate()
            .map(|(position, task)| TaskRow {
                position,
                id: task.id,
                title: task.title.clone(),
                done: task.done,
                deadline: task
                    .deadline
                    .map(|date| date.format(DEADLINE_FORMAT).to_string())
                    .unwrap_or_else(|| EMPTY_CELL.to_string()),
                reminder: task
                    .reminder
                    .map(|time| time.format(REMINDER_FORMAT).to_string())
                    .unwrap_or_else(|| EMPTY_CELL.to_string()),
                category: task.category.to_string(),
                label: task.label(as_of),
            })
            .collect()
    }

    /// Encodes the full list as task file text.
    pub fn serialize(&self) -> StoreResult<String> {
        Ok(encode_tasks(&self.tasks)?)
    }

    /// Replaces the full list with the tasks parsed from `text`.
    ///
    /// Returns the number of imported tasks. On error the list is unchanged.
    pub fn deserialize(&mut self, text: &str) -> StoreResult<usize> {
        let tasks = match decode_tasks(text) {
            Ok(tasks) => tasks,
            Err(err) => {
                warn!("event=task_import module=store status=error error_code=format error={err}");
                return Err(err.into());
            }
        };
        self.tasks = tasks;
        info!(
            "event=task_import module=store status=ok total={}",
            self.tasks.len()
        );
        Ok(self.tasks.len())
    }

    /// Writes the task file to `path` in one blocking write.
    pub fn export_to_path(&self, path: impl AsRef<Path>) -> StoreResult<()> {
        let text = self.serialize()?;
        if let Err(err) = std::fs::write(path.as_ref(), text) {
            warn!("event=task_export module=store status=error error_code=io error={err}");
            return Err(err.into());
        }
        info!(
            "event=task_export module=store status=ok total={}",
            self.tasks.len()
        );
        Ok(())
    }

    /// Reads `path` and replaces the list with its tasks.
    pub fn import_from_path(&mut self, path: impl AsRef<Path>) -> StoreResult<usize> {
        let text = match std::fs::read_to_string(path.as_ref()) {
            Ok(text) => text,
            Err(err) => {
                warn!("event=task_import module=store status=error error_code=io error={err}");
                return Err(err.into());
            }
        };
        self.deserialize(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::{StoreError, TaskStore, EMPTY_CELL};
    use crate::model::task::{NewTask, TaskLabel};
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn id_operations_survive_position_shifts() {
        let mut store = TaskStore::new();
        let first = store.add(NewTask::titled("first")).unwrap();
        let second = store.add(NewTask::titled("second")).unwrap();
        let third = store.add(NewTask::titled("third")).unwrap();

        store.delete(first).unwrap();
        assert!(store.toggle(third).unwrap());
        assert_eq!(store.position_of(second), Some(0));
        assert_eq!(store.position_of(third), Some(1));
        assert!(store.get(third).unwrap().done);
        assert!(!store.get(second).unwrap().done);
    }

    #[test]
    fn unknown_id_reports_not_found() {
        let mut store = TaskStore::new();
        let id = store.add(NewTask::titled("gone")).unwrap();
        store.delete(id).unwrap();

        assert!(matches!(store.toggle(id), Err(StoreError::NotFound(missing)) if missing == id));
        assert!(matches!(store.delete(id), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn rows_use_placeholder_for_absent_values() {
        let mut store = TaskStore::new();
        store.add(NewTask::titled("plain")).unwrap();
        store
            .add(
                NewTask::titled("timed")
                    .with_deadline(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
                    .with_reminder(NaiveTime::from_hms_opt(8, 0, 0).unwrap()),
            )
            .unwrap();

        let rows = store.rows(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(rows[0].deadline, EMPTY_CELL);
        assert_eq!(rows[0].reminder, EMPTY_CELL);
        assert_eq!(rows[0].category, "General");
        assert_eq!(rows[1].deadline, "2024-06-01");
        assert_eq!(rows[1].reminder, "08:00:00");
        assert_eq!(rows[1].label, TaskLabel::DueToday);
        assert_eq!(rows[1].position, 1);
    }

    #[test]
    fn clear_all_empties_the_list() {
        let mut store = TaskStore::new();
        store.add(NewTask::titled("a")).unwrap();
        store.add(NewTask::titled("b")).unwrap();

        assert_eq!(store.clear_all(), 2);
        assert!(store.is_empty());
    }
}

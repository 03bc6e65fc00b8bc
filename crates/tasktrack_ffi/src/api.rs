//! FFI use-case API for the Flutter task screen.
//!
//! # Responsibility
//! - Forward UI intents (add, toggle, delete, clear, import, export) to `TaskStore`.
//! - Hand the UI a render snapshot of rows plus progress statistics.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Errors are returned in response envelopes for inline display.
//! - One `TaskSession` per user session; no task state lives in globals.

use chrono::{Local, NaiveDate};
use log::warn;
use tasktrack_core::wire::task_file::{parse_category, parse_deadline, parse_reminder};
use tasktrack_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, Category, NewTask,
    TaskId, TaskRow, TaskStats, TaskStore,
};
use std::path::Path;

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns an empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), Path::new(log_dir.trim())) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Category names offered by the add-task form, in display order.
#[flutter_rust_bridge::frb(sync)]
pub fn category_options() -> Vec<String> {
    Category::ALL
        .iter()
        .map(|category| category.as_str().to_string())
        .collect()
}

/// Result envelope for mutating intents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskActionResponse {
    pub ok: bool,
    /// Affected task id, when the intent targets one task.
    pub task_id: Option<String>,
    /// Human-readable message for inline display.
    pub message: String,
}

impl TaskActionResponse {
    fn success(message: impl Into<String>, task_id: Option<String>) -> Self {
        Self {
            ok: true,
            task_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            task_id: None,
            message: message.into(),
        }
    }
}

/// Result envelope for export requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskExportResponse {
    pub ok: bool,
    /// Task file text; empty on failure.
    pub content: String,
    pub message: String,
}

/// One rendered table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRowView {
    pub task_id: String,
    pub title: String,
    pub done: bool,
    pub deadline: String,
    pub reminder: String,
    pub category: String,
    /// `completed|overdue|due_today|normal`.
    pub label: String,
}

/// Progress sidebar values.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskStatsView {
    pub total: u32,
    pub completed: u32,
    pub pending: u32,
    pub overdue: u32,
    pub due_today: u32,
    pub percent_completed: f64,
    pub percent_pending: f64,
    pub percent_overdue: f64,
    /// Whole-number percent for the progress bar.
    pub progress_percent: u8,
    pub summary: String,
}

/// Everything the task screen renders.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSnapshot {
    pub rows: Vec<TaskRowView>,
    pub stats: TaskStatsView,
    /// Reference date used for labels, `YYYY-MM-DD`.
    pub as_of: String,
}

/// Task list of one UI session.
#[flutter_rust_bridge::frb(opaque)]
#[derive(Debug, Default)]
pub struct TaskSession {
    store: TaskStore,
}

impl TaskSession {
    /// Creates an empty session; call once when the task screen opens.
    #[flutter_rust_bridge::frb(sync)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add-task form submit.
    ///
    /// Blank optional fields mean "not set"; `category` is case-insensitive.
    #[flutter_rust_bridge::frb(sync)]
    pub fn add_task(
        &mut self,
        title: String,
        deadline: Option<String>,
        reminder: Option<String>,
        category: Option<String>,
    ) -> TaskActionResponse {
        let input = match build_new_task(title, deadline, reminder, category) {
            Ok(input) => input,
            Err(message) => return TaskActionResponse::failure(message),
        };
        let title = input.title.clone();
        match self.store.add(input) {
            Ok(id) => TaskActionResponse::success(
                format!("Task '{title}' added!"),
                Some(id.to_string()),
            ),
            Err(err) => TaskActionResponse::failure(format!("add_task failed: {err}")),
        }
    }

    /// Checkbox toggle for one row.
    #[flutter_rust_bridge::frb(sync)]
    pub fn toggle_done(&mut self, task_id: String) -> TaskActionResponse {
        let id = match parse_task_id(&task_id) {
            Ok(id) => id,
            Err(message) => return TaskActionResponse::failure(message),
        };
        match self.store.toggle(id) {
            Ok(true) => TaskActionResponse::success("Task marked done.", Some(task_id)),
            Ok(false) => TaskActionResponse::success("Task marked pending.", Some(task_id)),
            Err(err) => TaskActionResponse::failure(format!("toggle_done failed: {err}")),
        }
    }

    /// Delete button for one row.
    #[flutter_rust_bridge::frb(sync)]
    pub fn delete_task(&mut self, task_id: String) -> TaskActionResponse {
        let id = match parse_task_id(&task_id) {
            Ok(id) => id,
            Err(message) => return TaskActionResponse::failure(message),
        };
        match self.store.delete(id) {
            Ok(_) => TaskActionResponse::success("Task deleted.", Some(task_id)),
            Err(err) => TaskActionResponse::failure(format!("delete_task failed: {err}")),
        }
    }

    #[flutter_rust_bridge::frb(sync)]
    pub fn clear_completed(&mut self) -> TaskActionResponse {
        let removed = self.store.clear_completed();
        TaskActionResponse::success(format!("Removed {removed} completed task(s)."), None)
    }

    /// Removes every task.
    #[flutter_rust_bridge::frb(sync)]
    pub fn reset(&mut self) -> TaskActionResponse {
        let removed = self.store.clear_all();
        TaskActionResponse::success(format!("Removed {removed} task(s)."), None)
    }

    /// Produces task file text for a download/save dialog.
    #[flutter_rust_bridge::frb(sync)]
    pub fn export_tasks(&self) -> TaskExportResponse {
        match self.store.serialize() {
            Ok(content) => TaskExportResponse {
                ok: true,
                content,
                message: format!("Exported {} task(s).", self.store.len()),
            },
            Err(err) => TaskExportResponse {
                ok: false,
                content: String::new(),
                message: format!("export_tasks failed: {err}"),
            },
        }
    }

    /// Replaces the session list with the contents of an uploaded task file.
    #[flutter_rust_bridge::frb(sync)]
    pub fn import_tasks(&mut self, file_contents: String) -> TaskActionResponse {
        match self.store.deserialize(&file_contents) {
            Ok(count) => TaskActionResponse::success(format!("Imported {count} task(s)."), None),
            Err(err) => TaskActionResponse::failure(format!("import_tasks failed: {err}")),
        }
    }

    /// Rows and statistics as of `as_of` (`YYYY-MM-DD`), defaulting to today.
    ///
    /// An unparsable `as_of` falls back to today.
    #[flutter_rust_bridge::frb(sync)]
    pub fn snapshot(&self, as_of: Option<String>) -> TaskSnapshot {
        let as_of = resolve_as_of(as_of.as_deref());
        TaskSnapshot {
            rows: self.store.rows(as_of).into_iter().map(to_row_view).collect(),
            stats: to_stats_view(&self.store.stats(as_of)),
            as_of: as_of.to_string(),
        }
    }
}

fn build_new_task(
    title: String,
    deadline: Option<String>,
    reminder: Option<String>,
    category: Option<String>,
) -> Result<NewTask, String> {
    let deadline = parse_deadline(deadline.as_deref())?;
    let reminder = parse_reminder(reminder.as_deref())?;
    let category = parse_category(category.as_deref())?;
    Ok(NewTask {
        title,
        deadline,
        reminder,
        category,
    })
}

fn parse_task_id(raw: &str) -> Result<TaskId, String> {
    TaskId::parse_str(raw.trim()).map_err(|_| format!("invalid task id `{raw}`"))
}

fn resolve_as_of(raw: Option<&str>) -> NaiveDate {
    match parse_deadline(raw) {
        Ok(Some(date)) => date,
        Ok(None) => Local::now().date_naive(),
        Err(message) => {
            warn!("event=snapshot module=ffi status=error error_code=bad_as_of error={message}");
            Local::now().date_naive()
        }
    }
}

fn to_row_view(row: TaskRow) -> TaskRowView {
    TaskRowView {
        task_id: row.id.to_string(),
        title: row.title,
        done: row.done,
        deadline: row.deadline,
        reminder: row.reminder,
        category: row.category,
        label: row.label.as_str().to_string(),
    }
}

fn to_stats_view(stats: &TaskStats) -> TaskStatsView {
    TaskStatsView {
        total: count_u32(stats.total),
        completed: count_u32(stats.completed),
        pending: count_u32(stats.pending),
        overdue: count_u32(stats.overdue),
        due_today: count_u32(stats.due_today),
        percent_completed: stats.percent_completed,
        percent_pending: stats.percent_pending,
        percent_overdue: stats.percent_overdue,
        progress_percent: stats.progress_percent(),
        summary: stats.summary_line(),
    }
}

fn count_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

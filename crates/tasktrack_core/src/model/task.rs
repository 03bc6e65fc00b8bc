//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record owned by `TaskStore`.
//! - Classify a task against a reference date for display and statistics.
//!
//! # Invariants
//! - `title` is never blank (at least one non-whitespace character).
//! - `id` is stable for the lifetime of the task and never reused.
//! - `done` starts as `false` for every newly created task.
//! - `deadline` years stay within 0000-9999 and `reminder` carries whole
//!   seconds only, so every task survives a task file round trip.

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable opaque identifier assigned to every task at creation/import time.
pub type TaskId = Uuid;

/// Fixed category set a task can be filed under.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Category {
    #[default]
    General,
    Work,
    Study,
    Personal,
    Other,
}

impl Category {
    /// Every category in display order.
    pub const ALL: [Category; 5] = [
        Self::General,
        Self::Work,
        Self::Study,
        Self::Personal,
        Self::Other,
    ];

    /// Display/wire name, e.g. `Work`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Work => "Work",
            Self::Study => "Study",
            Self::Personal => "Personal",
            Self::Other => "Other",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = TaskValidationError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(normalized))
            .ok_or_else(|| TaskValidationError::UnknownCategory(normalized.to_string()))
    }
}

/// Display classification of a task relative to a reference date.
///
/// Exactly one label applies per task. Precedence, highest first:
/// `Completed`, `Overdue`, `DueToday`, `Normal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskLabel {
    Completed,
    Overdue,
    DueToday,
    Normal,
}

impl TaskLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Overdue => "overdue",
            Self::DueToday => "due_today",
            Self::Normal => "normal",
        }
    }
}

/// Validation errors for task construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty or whitespace-only.
    EmptyTitle,
    /// Category text does not name one of [`Category::ALL`].
    UnknownCategory(String),
    /// Deadline year is outside 0000-9999.
    DeadlineOutOfRange(NaiveDate),
    /// Reminder has a sub-second part (including leap seconds).
    ReminderNotWholeSeconds(NaiveTime),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title must not be blank"),
            Self::UnknownCategory(value) => write!(
                f,
                "unknown category `{value}`; expected General|Work|Study|Personal|Other"
            ),
            Self::DeadlineOutOfRange(date) => {
                write!(f, "deadline `{date}` must fall within years 0000-9999")
            }
            Self::ReminderNotWholeSeconds(time) => {
                write!(f, "reminder `{time}` must be a whole second")
            }
        }
    }
}

impl Error for TaskValidationError {}

/// Input for creating a task. Optional fields default as in [`Task::new`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub deadline: Option<NaiveDate>,
    pub reminder: Option<NaiveTime>,
    pub category: Option<Category>,
}

impl NewTask {
    /// Title-only input with every optional field unset.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_reminder(mut self, reminder: NaiveTime) -> Self {
        self.reminder = Some(reminder);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }
}

/// One trackable to-do item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Stable identity; never exported to the task file.
    pub id: TaskId,
    /// User-entered text, stored exactly as entered.
    pub title: String,
    pub done: bool,
    /// Calendar date without time-of-day.
    pub deadline: Option<NaiveDate>,
    /// Stored for display only; reminders are never dispatched.
    pub reminder: Option<NaiveTime>,
    pub category: Category,
}

impl Task {
    /// Creates a not-done task with a freshly generated id.
    ///
    /// # Errors
    /// - `TaskValidationError::EmptyTitle` when `title` is blank.
    /// - `DeadlineOutOfRange` / `ReminderNotWholeSeconds` for values the
    ///   task file cannot represent.
    pub fn new(input: NewTask) -> Result<Self, TaskValidationError> {
        validate_title(&input.title)?;
        if let Some(deadline) = input.deadline {
            validate_deadline(deadline)?;
        }
        if let Some(reminder) = input.reminder {
            validate_reminder(reminder)?;
        }
        Ok(Self {
            id: Uuid::new_v4(),
            title: input.title,
            done: false,
            deadline: input.deadline,
            reminder: input.reminder,
            category: input.category.unwrap_or_default(),
        })
    }

    /// Classifies this task against `as_of`.
    pub fn label(&self, as_of: NaiveDate) -> TaskLabel {
        if self.done {
            return TaskLabel::Completed;
        }
        match self.deadline {
            Some(deadline) if deadline < as_of => TaskLabel::Overdue,
            Some(deadline) if deadline == as_of => TaskLabel::DueToday,
            _ => TaskLabel::Normal,
        }
    }

    /// Compares every user-visible field, ignoring `id`.
    pub fn same_content(&self, other: &Task) -> bool {
        self.title == other.title
            && self.done == other.done
            && self.deadline == other.deadline
            && self.reminder == other.reminder
            && self.category == other.category
    }
}

/// Rejects empty and whitespace-only titles.
pub fn validate_title(title: &str) -> Result<(), TaskValidationError> {
    if title.trim().is_empty() {
        return Err(TaskValidationError::EmptyTitle);
    }
    Ok(())
}

/// Rejects deadlines whose year needs more or fewer than four digits.
pub fn validate_deadline(deadline: NaiveDate) -> Result<(), TaskValidationError> {
    if !(0..=9999).contains(&deadline.year()) {
        return Err(TaskValidationError::DeadlineOutOfRange(deadline));
    }
    Ok(())
}

/// Rejects reminders with fractional seconds; chrono stores leap seconds there too.
pub fn validate_reminder(reminder: NaiveTime) -> Result<(), TaskValidationError> {
    if reminder.nanosecond() != 0 {
        return Err(TaskValidationError::ReminderNotWholeSeconds(reminder));
    }
    Ok(())
}

//! Task file codec.
//!
//! # Responsibility
//! - Encode the task list as a JSON array of five-key records.
//! - Decode and validate imported task files without touching store state.
//!
//! # Invariants
//! - Every exported record carries exactly `task`, `done`, `deadline`,
//!   `reminder`, `category`; absent date/time values are `""`.
//! - Decoding is all-or-nothing: one bad record rejects the whole file.
//! - Unknown extra keys are ignored; missing optional keys take creation defaults.

use crate::model::task::{validate_title, Category, Task};
use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Wire format for `deadline`.
pub const DEADLINE_FORMAT: &str = "%Y-%m-%d";
/// Wire format for `reminder`.
pub const REMINDER_FORMAT: &str = "%H:%M:%S";

static DEADLINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid deadline regex"));
static REMINDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{2}):(\d{2})(?::(\d{2}))?$").expect("valid reminder regex"));

/// Task file decode/encode failure.
#[derive(Debug)]
pub enum FormatError {
    /// Input is not well-formed JSON, or encoding failed.
    Json(serde_json::Error),
    /// Top-level value is not an array of records.
    NotASequence,
    /// One record is structurally invalid or carries an unparsable value.
    InvalidRecord { index: usize, reason: String },
}

impl Display for FormatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "task file is not valid JSON: {err}"),
            Self::NotASequence => write!(f, "task file must contain an array of task records"),
            Self::InvalidRecord { index, reason } => {
                write!(f, "invalid task record #{index}: {reason}")
            }
        }
    }
}

impl Error for FormatError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::NotASequence | Self::InvalidRecord { .. } => None,
        }
    }
}

impl From<serde_json::Error> for FormatError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Serialize)]
struct WireRecordOut<'a> {
    task: &'a str,
    done: bool,
    deadline: String,
    reminder: String,
    category: &'static str,
}

#[derive(Deserialize)]
struct WireRecordIn {
    task: String,
    done: bool,
    #[serde(default)]
    deadline: Option<String>,
    #[serde(default)]
    reminder: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

/// Encodes tasks in list order as a pretty-printed JSON array.
pub fn encode_tasks(tasks: &[Task]) -> Result<String, FormatError> {
    let records = tasks
        .iter()
        .map(|task| WireRecordOut {
            task: task.title.as_str(),
            done: task.done,
            deadline: task
                .deadline
                .map(|date| date.format(DEADLINE_FORMAT).to_string())
                .unwrap_or_default(),
            reminder: task
                .reminder
                .map(|time| time.format(REMINDER_FORMAT).to_string())
                .unwrap_or_default(),
            category: task.category.as_str(),
        })
        .collect::<Vec<_>>();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Decodes a task file into fresh tasks, each with a newly generated id.
///
/// # Errors
/// - `FormatError::Json` for malformed JSON.
/// - `FormatError::NotASequence` when the top level is not an array.
/// - `FormatError::InvalidRecord` for a non-object record, a missing or
///   mistyped `task`/`done`, a blank title, or an unparsable optional value.
pub fn decode_tasks(text: &str) -> Result<Vec<Task>, FormatError> {
    let root: Value = serde_json::from_str(text)?;
    let Value::Array(items) = root else {
        return Err(FormatError::NotASequence);
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| decode_record(index, item))
        .collect()
}

fn decode_record(index: usize, item: Value) -> Result<Task, FormatError> {
    let invalid = |reason: String| FormatError::InvalidRecord { index, reason };

    if !item.is_object() {
        return Err(invalid("record must be an object".to_string()));
    }
    let record: WireRecordIn =
        serde_json::from_value(item).map_err(|err| invalid(err.to_string()))?;

    validate_title(&record.task).map_err(|err| invalid(err.to_string()))?;
    let deadline = parse_deadline(record.deadline.as_deref()).map_err(invalid)?;
    let reminder = parse_reminder(record.reminder.as_deref()).map_err(invalid)?;
    let category = parse_category(record.category.as_deref())
        .map_err(invalid)?
        .unwrap_or_default();

    Ok(Task {
        id: Uuid::new_v4(),
        title: record.task,
        done: record.done,
        deadline,
        reminder,
        category,
    })
}

/// Parses an optional wire deadline; `None` and `""` mean absent.
pub fn parse_deadline(raw: Option<&str>) -> Result<Option<NaiveDate>, String> {
    let value = match raw.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(value) => value,
    };
    if !DEADLINE_RE.is_match(value) {
        return Err(format!("deadline `{value}` must be formatted YYYY-MM-DD"));
    }
    NaiveDate::parse_from_str(value, DEADLINE_FORMAT)
        .map(Some)
        .map_err(|err| format!("deadline `{value}` is not a calendar date: {err}"))
}

/// Parses an optional wire reminder; `None` and `""` mean absent.
///
/// Accepts `HH:MM:SS` and the shorter `HH:MM`.
pub fn parse_reminder(raw: Option<&str>) -> Result<Option<NaiveTime>, String> {
    let value = match raw.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(value) => value,
    };
    let captures = REMINDER_RE
        .captures(value)
        .ok_or_else(|| format!("reminder `{value}` must be formatted HH:MM:SS"))?;
    let field = |group: usize| -> u32 {
        captures
            .get(group)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    };
    NaiveTime::from_hms_opt(field(1), field(2), field(3))
        .map(Some)
        .ok_or_else(|| format!("reminder `{value}` is not a valid time of day"))
}

/// Parses an optional category name; `None` and blank mean unset.
pub fn parse_category(raw: Option<&str>) -> Result<Option<Category>, String> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<Category>()
            .map(Some)
            .map_err(|err| err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        decode_tasks, encode_tasks, parse_category, parse_deadline, parse_reminder, FormatError,
    };
    use crate::model::task::{Category, NewTask, Task};
    use chrono::{NaiveDate, NaiveTime};
    use serde_json::{json, Value};

    #[test]
    fn encode_writes_all_keys_with_empty_strings_for_absent_values() {
        let task = Task::new(NewTask::titled("Buy milk")).unwrap();
        let encoded = encode_tasks(&[task]).unwrap();
        let value: Value = serde_json::from_str(&encoded).unwrap();

        assert_eq!(
            value,
            json!([{
                "task": "Buy milk",
                "done": false,
                "deadline": "",
                "reminder": "",
                "category": "General"
            }])
        );
    }

    #[test]
    fn encode_formats_dates_and_times() {
        let task = Task::new(
            NewTask::titled("Standup")
                .with_deadline(NaiveDate::from_ymd_opt(2024, 3, 7).unwrap())
                .with_reminder(NaiveTime::from_hms_opt(9, 5, 0).unwrap())
                .with_category(Category::Work),
        )
        .unwrap();
        let value: Value = serde_json::from_str(&encode_tasks(&[task]).unwrap()).unwrap();

        assert_eq!(value[0]["deadline"], "2024-03-07");
        assert_eq!(value[0]["reminder"], "09:05:00");
        assert_eq!(value[0]["category"], "Work");
    }

    #[test]
    fn empty_list_encodes_as_empty_array() {
        let value: Value = serde_json::from_str(&encode_tasks(&[]).unwrap()).unwrap();
        assert_eq!(value, json!([]));
    }

    #[test]
    fn decode_rejects_non_array_root() {
        let err = decode_tasks(r#"{"task": "x", "done": false}"#).unwrap_err();
        assert!(matches!(err, FormatError::NotASequence));
    }

    #[test]
    fn decode_rejects_malformed_json() {
        let err = decode_tasks("[{").unwrap_err();
        assert!(matches!(err, FormatError::Json(_)));
    }

    #[test]
    fn decode_reports_index_of_bad_record() {
        let text = json!([
            {"task": "ok", "done": false},
            "not a record"
        ])
        .to_string();
        let err = decode_tasks(&text).unwrap_err();
        assert!(matches!(err, FormatError::InvalidRecord { index: 1, .. }));
    }

    #[test]
    fn decode_rejects_mistyped_done() {
        let text = json!([{"task": "x", "done": "yes"}]).to_string();
        assert!(matches!(
            decode_tasks(&text).unwrap_err(),
            FormatError::InvalidRecord { index: 0, .. }
        ));
    }

    #[test]
    fn decode_accepts_null_optional_values() {
        let text = json!([{"task": "x", "done": true, "deadline": null, "reminder": null}])
            .to_string();
        let tasks = decode_tasks(&text).unwrap();
        assert_eq!(tasks[0].deadline, None);
        assert_eq!(tasks[0].reminder, None);
        assert_eq!(tasks[0].category, Category::General);
    }

    #[test]
    fn parse_deadline_requires_padded_iso_date() {
        assert_eq!(
            parse_deadline(Some("2024-02-29")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert!(parse_deadline(Some("2024-2-9")).is_err());
        assert!(parse_deadline(Some("2023-02-29")).is_err());
        assert_eq!(parse_deadline(Some("")).unwrap(), None);
    }

    #[test]
    fn parse_reminder_accepts_short_form_and_rejects_out_of_range() {
        assert_eq!(
            parse_reminder(Some("18:30")).unwrap(),
            NaiveTime::from_hms_opt(18, 30, 0)
        );
        assert_eq!(
            parse_reminder(Some("07:15:42")).unwrap(),
            NaiveTime::from_hms_opt(7, 15, 42)
        );
        assert!(parse_reminder(Some("25:00:00")).is_err());
        assert!(parse_reminder(Some("7pm")).is_err());
    }

    #[test]
    fn every_category_uses_its_display_name_on_the_wire() {
        let tasks = Category::ALL
            .into_iter()
            .map(|category| Task::new(NewTask::titled("t").with_category(category)).unwrap())
            .collect::<Vec<_>>();
        let encoded = encode_tasks(&tasks).unwrap();
        let value: Value = serde_json::from_str(&encoded).unwrap();

        let names = value
            .as_array()
            .unwrap()
            .iter()
            .map(|record| record["category"].as_str().unwrap().to_string())
            .collect::<Vec<_>>();
        let expected = ["General", "Work", "Study", "Personal", "Other"].map(str::to_string);
        assert_eq!(names, expected);
        let decoded = decode_tasks(&encoded).unwrap();
        assert!(decoded
            .iter()
            .zip(Category::ALL)
            .all(|(task, category)| task.category == category));
    }

    #[test]
    fn parse_category_treats_blank_as_unset() {
        assert_eq!(parse_category(None).unwrap(), None);
        assert_eq!(parse_category(Some("")).unwrap(), None);
        assert_eq!(parse_category(Some("   ")).unwrap(), None);
        assert_eq!(parse_category(Some(" work ")).unwrap(), Some(Category::Work));
        assert!(parse_category(Some("Chores")).is_err());
    }
}

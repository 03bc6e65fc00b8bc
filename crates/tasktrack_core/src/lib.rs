//! Core domain logic for tasktrack.
//! This crate is the single source of truth for task list invariants.

pub mod config;
pub mod logging;
pub mod model;
pub mod store;
pub mod wire;

pub use config::{ConfigError, TaskTrackConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::task::{Category, NewTask, Task, TaskId, TaskLabel, TaskValidationError};
pub use store::stats::TaskStats;
pub use store::task_store::{StoreError, StoreResult, TaskRow, TaskStore, EMPTY_CELL};
pub use wire::task_file::{decode_tasks, encode_tasks, FormatError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

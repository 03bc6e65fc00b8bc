//! Runtime configuration resolved from the environment.
//!
//! # Responsibility
//! - Resolve the task file location and logging settings for front ends.
//!
//! # Invariants
//! - Blank environment values are treated as unset.
//! - A configured log directory is always absolute.

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Task file path override.
pub const ENV_TASK_FILE: &str = "TASKTRACK_FILE";
/// Log level override (`trace|debug|info|warn|error`).
pub const ENV_LOG_LEVEL: &str = "TASKTRACK_LOG_LEVEL";
/// Absolute log directory; logging stays off when unset.
pub const ENV_LOG_DIR: &str = "TASKTRACK_LOG_DIR";

const DEFAULT_TASK_FILE_NAME: &str = "tasks.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidLogLevel(String),
    RelativeLogDir(PathBuf),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(message) => write!(f, "{ENV_LOG_LEVEL}: {message}"),
            Self::RelativeLogDir(path) => write!(
                f,
                "{ENV_LOG_DIR} must be an absolute path, got `{}`",
                path.display()
            ),
        }
    }
}

impl Error for ConfigError {}

/// Resolved front-end configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskTrackConfig {
    pub task_file: PathBuf,
    pub log_level: &'static str,
    pub log_dir: Option<PathBuf>,
}

impl TaskTrackConfig {
    /// Resolves configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let task_file = read(ENV_TASK_FILE)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_TASK_FILE_NAME));

        let log_level = match read(ENV_LOG_LEVEL) {
            Some(level) => normalize_level(&level).map_err(ConfigError::InvalidLogLevel)?,
            None => default_log_level(),
        };

        let log_dir = match read(ENV_LOG_DIR).map(PathBuf::from) {
            Some(dir) if !dir.is_absolute() => return Err(ConfigError::RelativeLogDir(dir)),
            other => other,
        };

        Ok(Self {
            task_file,
            log_level,
            log_dir,
        })
    }
}

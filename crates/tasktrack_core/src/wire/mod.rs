//! Exchange formats for moving task lists in and out of the process.
//!
//! # Responsibility
//! - Translate between in-memory tasks and the exported task file.
//! - Keep the on-disk "empty string means absent" convention at this boundary.

pub mod task_file;

//! Task domain model.
//!
//! # Responsibility
//! - Define the task record, its category set and display classification.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`, independent of list position.

pub mod task;

//! Task list ownership and derived statistics.
//!
//! # Responsibility
//! - Own the session task list behind `TaskStore`.
//! - Derive counts and percentages without mutating state.
//!
//! # Invariants
//! - Only `TaskStore` operations mutate the list.
//! - Error paths never leave a partial mutation behind.

pub mod stats;
pub mod task_store;

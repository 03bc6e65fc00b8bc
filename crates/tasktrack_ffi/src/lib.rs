//! Flutter-facing bindings for tasktrack.

pub mod api;

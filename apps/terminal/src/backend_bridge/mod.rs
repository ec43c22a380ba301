//! Worker thread that owns the search session and its tokio runtime.

pub mod commands;
pub mod runtime;

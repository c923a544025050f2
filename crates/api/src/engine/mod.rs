//! Multi-step project operations built on the repositories.
//!
//! - [`progress`] -- recompute a project's progress from its persisted steps.
//! - [`file_sync`] -- reconcile a project's files with its Drive folder.

pub mod file_sync;
pub mod progress;

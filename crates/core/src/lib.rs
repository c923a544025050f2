//! Domain logic shared by the portal crates.
//!
//! Everything here is free of I/O: the database and the remote storage
//! provider are reached through `portal-db` and the [`file_sync::RemoteFileLister`]
//! seam respectively.

pub mod error;
pub mod file_sync;
pub mod progress;
pub mod project;
pub mod roles;
pub mod ticket;
pub mod types;

//! Google Drive folder listing for project file sync.
//!
//! - [`auth`] -- service-account key loading and cached access tokens.
//! - [`api`] -- the Drive v3 `files.list` client, implementing
//!   [`RemoteFileLister`](portal_core::file_sync::RemoteFileLister).

pub mod api;
pub mod auth;

pub use api::{DriveClient, DriveError};
pub use auth::{ServiceAccountKey, TokenSource};

//! Project file model (files mirrored from the project's Drive folder).

use serde::Serialize;
use sqlx::FromRow;
use portal_core::types::{DbId, Timestamp};

/// A file row from the `project_files` table.
///
/// At most one row exists per `(project_id, drive_file_id)`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectFile {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub drive_file_id: String,
    pub drive_file_url: String,
    pub mime_type: Option<String>,
    pub size_bytes: Option<i64>,
    pub created_at: Timestamp,
}

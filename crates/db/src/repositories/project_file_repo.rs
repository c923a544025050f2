//! Repository for the `project_files` table.

use sqlx::PgPool;
use portal_core::file_sync::NewSyncedFile;
use portal_core::types::DbId;

use crate::models::project_file::ProjectFile;

const COLUMNS: &str = "id, project_id, name, drive_file_id, drive_file_url, mime_type, \
                        size_bytes, created_at";

pub struct ProjectFileRepo;

impl ProjectFileRepo {
    /// List a project's files, most recently added first.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectFile>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_files
             WHERE project_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, ProjectFile>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// List the files of several projects, newest first within each project.
    pub async fn list_by_projects(
        pool: &PgPool,
        project_ids: &[DbId],
    ) -> Result<Vec<ProjectFile>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_files
             WHERE project_id = ANY($1)
             ORDER BY project_id, created_at DESC, id DESC"
        );
        sqlx::query_as::<_, ProjectFile>(&query)
            .bind(project_ids)
            .fetch_all(pool)
            .await
    }

    /// The Drive file ids already recorded for a project.
    pub async fn list_drive_ids(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT drive_file_id FROM project_files WHERE project_id = $1",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// Insert a file record unless one already exists for the same
    /// `(project_id, drive_file_id)`.
    ///
    /// Returns `None` when a concurrent sync recorded the file first.
    pub async fn insert_if_absent(
        pool: &PgPool,
        project_id: DbId,
        file: &NewSyncedFile,
    ) -> Result<Option<ProjectFile>, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_files
                (project_id, name, drive_file_id, drive_file_url, mime_type, size_bytes)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (project_id, drive_file_id) DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectFile>(&query)
            .bind(project_id)
            .bind(&file.name)
            .bind(&file.drive_file_id)
            .bind(&file.drive_file_url)
            .bind(&file.mime_type)
            .bind(file.size_bytes)
            .fetch_optional(pool)
            .await
    }
}

//! Repository for the `projects` table.

use sqlx::PgPool;
use portal_core::project::STATUS_NOT_STARTED;
use portal_core::types::DbId;

use crate::models::project::{CreateProject, Project, ProjectScope, UpdateProject};
use crate::repositories::scope_filter;

/// Column list (aliased `p`) shared across queries.
const COLUMNS: &str = "p.id, p.name, p.description, p.status, p.progress, p.start_date, \
                        p.end_date, p.drive_folder_id, p.drive_folder_url, p.admin_id, \
                        p.client_id, p.company_id, p.created_at, p.updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project with `progress = 0`, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects AS p (name, description, status, start_date, end_date,
                                        drive_folder_id, drive_folder_url, admin_id,
                                        client_id, company_id)
             VALUES ($1, $2, COALESCE($3, '{STATUS_NOT_STARTED}'), $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.status)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.drive_folder_id)
            .bind(&input.drive_folder_url)
            .bind(input.admin_id)
            .bind(input.client_id)
            .bind(input.company_id)
            .fetch_one(pool)
            .await
    }

    /// Find a project by ID regardless of scope.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects p WHERE p.id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the projects visible within `scope`, most recently updated first.
    pub async fn list(pool: &PgPool, scope: &ProjectScope) -> Result<Vec<Project>, sqlx::Error> {
        let (all, user_id, company_id) = scope.binds();
        let query = format!(
            "SELECT {COLUMNS} FROM projects p
             WHERE {}
             ORDER BY p.updated_at DESC, p.id DESC",
            scope_filter(1)
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(all)
            .bind(user_id)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }

    /// Apply an edit. Every scalar is replaced, so `None` clears the column;
    /// only `status` falls back to its current value. `progress` is never
    /// touched here.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects AS p SET
                name = $2,
                description = $3,
                status = COALESCE($4, status),
                start_date = $5,
                end_date = $6,
                drive_folder_id = $7,
                drive_folder_url = $8,
                client_id = $9,
                company_id = $10
             WHERE p.id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.status)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.drive_folder_id)
            .bind(&input.drive_folder_url)
            .bind(input.client_id)
            .bind(input.company_id)
            .fetch_optional(pool)
            .await
    }

    /// Store a recomputed progress value. Returns the updated row.
    pub async fn set_progress(
        pool: &PgPool,
        id: DbId,
        progress: i32,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects AS p SET progress = $2 WHERE p.id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(progress)
            .fetch_optional(pool)
            .await
    }

    /// Record the Drive folder id resolved from the folder URL.
    pub async fn set_drive_folder_id(
        pool: &PgPool,
        id: DbId,
        folder_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE projects SET drive_folder_id = $2 WHERE id = $1")
            .bind(id)
            .bind(folder_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a project. Steps, actions, files, tickets, and comments cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Ticket counts per project, for the given project ids. Projects with
    /// no tickets are absent from the result.
    pub async fn ticket_counts(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<Vec<(DbId, i64)>, sqlx::Error> {
        sqlx::query_as::<_, (DbId, i64)>(
            "SELECT project_id, COUNT(*) FROM tickets
             WHERE project_id = ANY($1)
             GROUP BY project_id",
        )
        .bind(ids)
        .fetch_all(pool)
        .await
    }
}

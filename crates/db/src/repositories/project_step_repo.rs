//! Repository for the `project_steps` table.

use sqlx::PgPool;
use portal_core::progress::completion_timestamp;
use portal_core::project::sort_order_for;
use portal_core::types::{DbId, Timestamp};

use crate::models::project_step::{NewProjectStep, ProjectStep};

const COLUMNS: &str = "id, project_id, title, description, start_date, end_date, completed, \
                        completed_at, sort_order, created_at, updated_at";

pub struct ProjectStepRepo;

impl ProjectStepRepo {
    /// List a project's steps in display order.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectStep>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_steps
             WHERE project_id = $1
             ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, ProjectStep>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// List the steps of several projects, grouped by project then order.
    pub async fn list_by_projects(
        pool: &PgPool,
        project_ids: &[DbId],
    ) -> Result<Vec<ProjectStep>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_steps
             WHERE project_id = ANY($1)
             ORDER BY project_id, sort_order, id"
        );
        sqlx::query_as::<_, ProjectStep>(&query)
            .bind(project_ids)
            .fetch_all(pool)
            .await
    }

    /// Replace a project's entire step list inside one transaction.
    ///
    /// Each step's `sort_order` is its zero-based position in `steps`, and
    /// completed steps are stamped with `now`.
    pub async fn replace_all(
        pool: &PgPool,
        project_id: DbId,
        steps: &[NewProjectStep],
        now: Timestamp,
    ) -> Result<Vec<ProjectStep>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM project_steps WHERE project_id = $1")
            .bind(project_id)
            .execute(&mut *tx)
            .await?;

        let query = format!(
            "INSERT INTO project_steps
                (project_id, title, description, start_date, end_date,
                 completed, completed_at, sort_order)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );

        let mut created = Vec::with_capacity(steps.len());
        for (index, step) in steps.iter().enumerate() {
            let row = sqlx::query_as::<_, ProjectStep>(&query)
                .bind(project_id)
                .bind(&step.title)
                .bind(&step.description)
                .bind(step.start_date)
                .bind(step.end_date)
                .bind(step.completed)
                .bind(completion_timestamp(step.completed, now))
                .bind(sort_order_for(index))
                .fetch_one(&mut *tx)
                .await?;
            created.push(row);
        }

        tx.commit().await?;
        Ok(created)
    }

    /// Set one step's completion flag, keeping `completed_at` consistent.
    ///
    /// Returns `None` if the step does not exist or belongs to another project.
    pub async fn set_completed(
        pool: &PgPool,
        project_id: DbId,
        step_id: DbId,
        completed: bool,
        now: Timestamp,
    ) -> Result<Option<ProjectStep>, sqlx::Error> {
        let query = format!(
            "UPDATE project_steps SET completed = $3, completed_at = $4
             WHERE id = $2 AND project_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectStep>(&query)
            .bind(project_id)
            .bind(step_id)
            .bind(completed)
            .bind(completion_timestamp(completed, now))
            .fetch_optional(pool)
            .await
    }
}

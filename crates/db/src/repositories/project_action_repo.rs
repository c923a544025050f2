//! Repository for the `project_actions` table.

use sqlx::PgPool;
use portal_core::project::sort_order_for;
use portal_core::types::DbId;

use crate::models::project_action::{NewProjectAction, ProjectAction};

const COLUMNS: &str = "id, project_id, title, description, action_type, completed, due_date, \
                        sort_order, created_at, updated_at";

pub struct ProjectActionRepo;

impl ProjectActionRepo {
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectAction>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_actions
             WHERE project_id = $1
             ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, ProjectAction>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// List the actions of several projects, grouped by project then order.
    pub async fn list_by_projects(
        pool: &PgPool,
        project_ids: &[DbId],
    ) -> Result<Vec<ProjectAction>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_actions
             WHERE project_id = ANY($1)
             ORDER BY project_id, sort_order, id"
        );
        sqlx::query_as::<_, ProjectAction>(&query)
            .bind(project_ids)
            .fetch_all(pool)
            .await
    }

    /// Replace a project's entire action list inside one transaction.
    pub async fn replace_all(
        pool: &PgPool,
        project_id: DbId,
        actions: &[NewProjectAction],
    ) -> Result<Vec<ProjectAction>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM project_actions WHERE project_id = $1")
            .bind(project_id)
            .execute(&mut *tx)
            .await?;

        let query = format!(
            "INSERT INTO project_actions
                (project_id, title, description, action_type, completed, due_date, sort_order)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );

        let mut created = Vec::with_capacity(actions.len());
        for (index, action) in actions.iter().enumerate() {
            let row = sqlx::query_as::<_, ProjectAction>(&query)
                .bind(project_id)
                .bind(&action.title)
                .bind(&action.description)
                .bind(&action.action_type)
                .bind(action.completed)
                .bind(action.due_date)
                .bind(sort_order_for(index))
                .fetch_one(&mut *tx)
                .await?;
            created.push(row);
        }

        tx.commit().await?;
        Ok(created)
    }
}

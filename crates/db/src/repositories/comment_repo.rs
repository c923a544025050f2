//! Repository for the `comments` table.

use sqlx::PgPool;
use portal_core::types::DbId;

use crate::models::comment::CommentWithAuthor;

/// Comment columns (aliased `c`) joined with the author's public profile.
const COLUMNS: &str = "c.id, c.project_id, c.content, c.created_at, c.user_id, \
                        u.name AS user_name, ro.name AS user_role, u.avatar AS user_avatar";

pub struct CommentRepo;

impl CommentRepo {
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
        content: &str,
    ) -> Result<CommentWithAuthor, sqlx::Error> {
        let query = format!(
            "WITH c AS (
                INSERT INTO comments (project_id, user_id, content)
                VALUES ($1, $2, $3)
                RETURNING id, project_id, user_id, content, created_at
             )
             SELECT {COLUMNS}
             FROM c
             JOIN users u ON u.id = c.user_id
             JOIN roles ro ON ro.id = u.role_id"
        );
        sqlx::query_as::<_, CommentWithAuthor>(&query)
            .bind(project_id)
            .bind(user_id)
            .bind(content)
            .fetch_one(pool)
            .await
    }

    /// A project's comments, newest first.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<CommentWithAuthor>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}
             FROM comments c
             JOIN users u ON u.id = c.user_id
             JOIN roles ro ON ro.id = u.role_id
             WHERE c.project_id = $1
             ORDER BY c.created_at DESC, c.id DESC"
        );
        sqlx::query_as::<_, CommentWithAuthor>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }
}

//! Repository for the `companies` table.

use sqlx::PgPool;
use portal_core::types::DbId;

use crate::models::company::{CompanyInput, CompanySummary, CompanyWithCounts, DetachedCounts};

/// Company columns plus correlated member and project counts.
const COLUMNS_WITH_COUNTS: &str = "c.id, c.name, c.description, c.logo, c.created_at, c.updated_at, \
     (SELECT COUNT(*) FROM users u WHERE u.company_id = c.id) AS user_count, \
     (SELECT COUNT(*) FROM projects p WHERE p.company_id = c.id) AS project_count";

pub struct CompanyRepo;

impl CompanyRepo {
    /// Insert a company and return it with zero counts.
    pub async fn create(
        pool: &PgPool,
        input: &CompanyInput,
    ) -> Result<CompanyWithCounts, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO companies (name, description, logo) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.logo)
        .fetch_one(pool)
        .await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CompanyWithCounts>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS_WITH_COUNTS} FROM companies c WHERE c.id = $1");
        sqlx::query_as::<_, CompanyWithCounts>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List companies newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<CompanyWithCounts>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS_WITH_COUNTS} FROM companies c ORDER BY c.created_at DESC, c.id DESC"
        );
        sqlx::query_as::<_, CompanyWithCounts>(&query)
            .fetch_all(pool)
            .await
    }

    /// Fetch summaries for a set of companies.
    pub async fn list_summaries(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<Vec<CompanySummary>, sqlx::Error> {
        sqlx::query_as::<_, CompanySummary>(
            "SELECT id, name, logo FROM companies WHERE id = ANY($1) ORDER BY id",
        )
        .bind(ids)
        .fetch_all(pool)
        .await
    }

    /// Replace a company's fields. Returns `None` if it does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &CompanyInput,
    ) -> Result<Option<CompanyWithCounts>, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE companies SET name = $2, description = $3, logo = $4 WHERE id = $1",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.logo)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::find_by_id(pool, id).await
    }

    /// Delete a company after detaching its users and projects.
    ///
    /// Runs in a single transaction. Returns `None` if the company does not
    /// exist, otherwise how many users and projects were detached.
    pub async fn delete_detaching(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<DetachedCounts>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let locked: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM companies WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Ok(None);
        }

        let users = sqlx::query("UPDATE users SET company_id = NULL WHERE company_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        let projects = sqlx::query("UPDATE projects SET company_id = NULL WHERE company_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(DetachedCounts { users, projects }))
    }
}

//! Case-insensitive substring search across projects, actions, and tickets.

use sqlx::PgPool;
use portal_core::types::DbId;

use crate::models::project::ProjectScope;
use crate::models::search::{ActionHit, ProjectHit, TicketHit};
use crate::repositories::scope_filter;

/// Escape `%`, `_`, and `\` so `term` matches literally inside `ILIKE`.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

pub struct SearchRepo;

impl SearchRepo {
    /// Projects in `scope` whose name or description contains `term`.
    pub async fn projects(
        pool: &PgPool,
        scope: &ProjectScope,
        term: &str,
        limit: i64,
    ) -> Result<Vec<ProjectHit>, sqlx::Error> {
        let (all, user_id, company_id) = scope.binds();
        let query = format!(
            "SELECT p.id, p.name, p.description, p.status,
                    cu.name AS client_name, au.name AS admin_name
             FROM projects p
             JOIN users cu ON cu.id = p.client_id
             JOIN users au ON au.id = p.admin_id
             WHERE (p.name ILIKE $1 OR p.description ILIKE $1)
               AND {}
             ORDER BY p.created_at DESC, p.id DESC
             LIMIT $5",
            scope_filter(2)
        );
        sqlx::query_as::<_, ProjectHit>(&query)
            .bind(like_pattern(term))
            .bind(all)
            .bind(user_id)
            .bind(company_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Actions of projects in `scope` whose title or description contains `term`.
    pub async fn actions(
        pool: &PgPool,
        scope: &ProjectScope,
        term: &str,
        limit: i64,
    ) -> Result<Vec<ActionHit>, sqlx::Error> {
        let (all, user_id, company_id) = scope.binds();
        let query = format!(
            "SELECT a.id, a.title, a.description, a.project_id, p.name AS project_name
             FROM project_actions a
             JOIN projects p ON p.id = a.project_id
             WHERE (a.title ILIKE $1 OR a.description ILIKE $1)
               AND {}
             ORDER BY a.created_at DESC, a.id DESC
             LIMIT $5",
            scope_filter(2)
        );
        sqlx::query_as::<_, ActionHit>(&query)
            .bind(like_pattern(term))
            .bind(all)
            .bind(user_id)
            .bind(company_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Tickets whose subject or message contains `term`. `owner = Some(id)`
    /// restricts the search to that user's tickets.
    pub async fn tickets(
        pool: &PgPool,
        owner: Option<DbId>,
        term: &str,
        limit: i64,
    ) -> Result<Vec<TicketHit>, sqlx::Error> {
        sqlx::query_as::<_, TicketHit>(
            "SELECT t.id, t.subject, t.status, t.project_id, p.name AS project_name
             FROM tickets t
             LEFT JOIN projects p ON p.id = t.project_id
             WHERE (t.subject ILIKE $1 OR t.message ILIKE $1)
               AND ($2::BIGINT IS NULL OR t.user_id = $2)
             ORDER BY t.created_at DESC, t.id DESC
             LIMIT $3",
        )
        .bind(like_pattern(term))
        .bind(owner)
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}

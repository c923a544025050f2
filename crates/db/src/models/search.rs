//! Row types returned by full-portal search.

use serde::Serialize;
use sqlx::FromRow;
use portal_core::types::DbId;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectHit {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub client_name: String,
    pub admin_name: String,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActionHit {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub project_id: DbId,
    pub project_name: String,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TicketHit {
    pub id: DbId,
    pub subject: String,
    pub status: String,
    pub project_id: Option<DbId>,
    pub project_name: Option<String>,
}

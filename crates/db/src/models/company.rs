//! Company entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use portal_core::types::{DbId, Timestamp};

/// A company row with its member and project counts.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CompanyWithCounts {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub logo: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub user_count: i64,
    pub project_count: i64,
}

/// Minimal company reference embedded in users and projects.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CompanySummary {
    pub id: DbId,
    pub name: String,
    pub logo: Option<String>,
}

/// DTO for creating or replacing a company.
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyInput {
    pub name: String,
    pub description: Option<String>,
    pub logo: Option<String>,
}

/// Number of rows detached when a company is deleted.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DetachedCounts {
    pub users: u64,
    pub projects: u64,
}

//! User entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use portal_core::types::{DbId, Timestamp};

use crate::models::company::CompanySummary;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role_id: DbId,
    pub avatar: Option<String>,
    pub company_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub email: String,
    pub name: String,
    /// Resolved role name (e.g. `"admin"`, `"client"`).
    pub role: String,
    pub role_id: DbId,
    pub avatar: Option<String>,
    pub company_id: Option<DbId>,
    pub company: Option<CompanySummary>,
    pub created_at: Timestamp,
}

/// Minimal user reference embedded in projects and tickets.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserSummary {
    pub id: DbId,
    pub name: String,
    pub email: String,
}

/// DTO for creating a new user.
#[derive(Debug)]
pub struct CreateUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role_id: DbId,
    pub avatar: Option<String>,
    pub company_id: Option<DbId>,
}

/// DTO for replacing a user's profile fields. `company_id = None` detaches
/// the user from any company.
#[derive(Debug)]
pub struct UpdateUser {
    pub email: String,
    pub name: String,
    pub role_id: DbId,
    pub company_id: Option<DbId>,
}

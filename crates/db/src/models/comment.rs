//! Project comment model.

use serde::Serialize;
use sqlx::FromRow;
use portal_core::types::{DbId, Timestamp};

/// A comment joined with its author's public profile.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommentWithAuthor {
    pub id: DbId,
    pub project_id: DbId,
    pub content: String,
    pub created_at: Timestamp,
    pub user_id: DbId,
    pub user_name: String,
    pub user_role: String,
    pub user_avatar: Option<String>,
}

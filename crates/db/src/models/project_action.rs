//! Project action (task list entry) model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use portal_core::types::{DbId, Timestamp};

/// An action row from the `project_actions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectAction {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub action_type: String,
    pub completed: bool,
    pub due_date: Option<Timestamp>,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for one action of a full action-list replacement.
#[derive(Debug, Clone)]
pub struct NewProjectAction {
    pub title: String,
    pub description: Option<String>,
    pub action_type: String,
    pub completed: bool,
    pub due_date: Option<Timestamp>,
}

//! Project step (timeline entry) model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use portal_core::types::{DbId, Timestamp};

/// A step row from the `project_steps` table.
///
/// `completed_at` is set if and only if `completed` is true
/// (`ck_project_steps_completed_at`).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectStep {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub completed: bool,
    pub completed_at: Option<Timestamp>,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for one step of a full step-list replacement. Position in the list
/// becomes the zero-based `sort_order`.
#[derive(Debug, Clone)]
pub struct NewProjectStep {
    pub title: String,
    pub description: Option<String>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub completed: bool,
}

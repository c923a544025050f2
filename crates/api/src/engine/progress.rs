//! Project progress recomputation.
//!
//! The only code path that writes `projects.progress`. It always reads the
//! current persisted step list, so callers run it after their step writes.

use portal_core::error::CoreError;
use portal_core::progress::compute_progress;
use portal_core::types::DbId;
use portal_db::models::project::Project;
use portal_db::repositories::{ProjectRepo, ProjectStepRepo};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

/// Re-read a project's steps, recompute its progress, and store it.
///
/// Returns the updated project row.
pub async fn refresh_progress(pool: &PgPool, project_id: DbId) -> AppResult<Project> {
    let steps = ProjectStepRepo::list_by_project(pool, project_id).await?;
    let progress = compute_progress(steps.iter().map(|s| s.completed));

    let project = ProjectRepo::set_progress(pool, project_id, progress)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;

    tracing::debug!(project_id, progress, steps = steps.len(), "Project progress recomputed");
    Ok(project)
}

//! Handler for toggling a single project step.

use axum::extract::{Path, State};
use chrono::Utc;
use portal_core::error::CoreError;
use portal_core::types::DbId;
use portal_db::models::project_step::ProjectStep;
use portal_db::repositories::ProjectStepRepo;
use serde::Deserialize;

use crate::engine::progress::refresh_progress;
use crate::error::{AppError, AppResult};
use crate::extract::Json;
use crate::handlers::projects::find_project;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PATCH /projects/{id}/steps/{step_id}`.
#[derive(Debug, Deserialize)]
pub struct ToggleStepRequest {
    pub completed: bool,
}

/// PATCH /api/v1/projects/{id}/steps/{step_id}
///
/// Sets the step's completion flag, then recomputes the project's progress
/// from its stored steps.
pub async fn toggle(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path((project_id, step_id)): Path<(DbId, DbId)>,
    Json(input): Json<ToggleStepRequest>,
) -> AppResult<Json<DataResponse<ProjectStep>>> {
    find_project(&state.pool, project_id).await?;

    let step = ProjectStepRepo::set_completed(
        &state.pool,
        project_id,
        step_id,
        input.completed,
        Utc::now(),
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "Step",
        id: step_id,
    }))?;

    let project = refresh_progress(&state.pool, project_id).await?;

    tracing::info!(
        project_id,
        step_id,
        completed = step.completed,
        progress = project.progress,
        updated_by = admin.user_id,
        "Step toggled",
    );

    Ok(Json(DataResponse { data: step }))
}

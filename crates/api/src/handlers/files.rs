//! Handlers for a project's synchronized Drive files.

use axum::extract::{Path, State};
use portal_core::error::CoreError;
use portal_core::file_sync::{parse_drive_folder_id, sync_summary};
use portal_core::types::DbId;
use portal_db::models::project_file::ProjectFile;
use portal_db::repositories::{ProjectFileRepo, ProjectRepo};
use serde::Serialize;

use crate::engine::file_sync::reconcile;
use crate::error::{AppError, AppResult};
use crate::extract::Json;
use crate::handlers::projects::find_project;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response for `POST /projects/{id}/sync-files`.
#[derive(Debug, Serialize)]
pub struct SyncFilesResponse {
    pub message: String,
    /// Files created by this sync.
    pub synced_files: Vec<ProjectFile>,
    pub total_files: usize,
    /// Every file of the project, newest first.
    pub files: Vec<ProjectFile>,
}

/// GET /api/v1/projects/{id}/files
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ProjectFile>>>> {
    let project = find_project(&state.pool, project_id).await?;
    user.ensure_can_view(&project)?;

    let files = ProjectFileRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: files }))
}

/// POST /api/v1/projects/{id}/sync-files
///
/// Pulls the linked Drive folder and records files not seen before. When
/// only a folder URL is stored, the parsed folder id is saved first.
pub async fn sync(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<SyncFilesResponse>>> {
    let project = find_project(&state.pool, project_id).await?;

    let (folder_id, parsed_from_url) = match project.drive_folder_id {
        Some(id) => (id, false),
        None => {
            let parsed = project
                .drive_folder_url
                .as_deref()
                .and_then(parse_drive_folder_id)
                .ok_or_else(|| {
                    AppError::Core(CoreError::Validation(
                        "Project has no Google Drive folder configured".into(),
                    ))
                })?;
            (parsed, true)
        }
    };

    let lister = state.drive.as_ref().ok_or_else(|| {
        AppError::Core(CoreError::IntegrationNotConfigured(
            "Google Drive integration is not configured".into(),
        ))
    })?;

    let outcome = reconcile(&state.pool, lister.as_ref(), project_id, &folder_id).await?;

    if parsed_from_url {
        ProjectRepo::set_drive_folder_id(&state.pool, project_id, &folder_id).await?;
    }

    tracing::info!(
        project_id,
        synced = outcome.inserted.len(),
        requested_by = admin.user_id,
        "File sync finished",
    );

    Ok(Json(DataResponse {
        data: SyncFilesResponse {
            message: sync_summary(outcome.inserted.len()),
            total_files: outcome.files.len(),
            synced_files: outcome.inserted,
            files: outcome.files,
        },
    }))
}

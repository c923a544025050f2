//! Handlers for the `/companies` resource.
//!
//! All handlers require the `admin` role.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use portal_core::error::CoreError;
use portal_core::project::require_non_blank;
use portal_core::types::DbId;
use portal_db::models::company::{CompanyInput, CompanyWithCounts};
use portal_db::repositories::CompanyRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::extract::Json;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response for `DELETE /companies/{id}`.
#[derive(Debug, Serialize)]
pub struct CompanyDeleted {
    pub success: bool,
    pub message: String,
    pub detached_users: u64,
    pub detached_projects: u64,
}

fn normalize(input: CompanyInput) -> AppResult<CompanyInput> {
    require_non_blank("name", &input.name)?;
    Ok(CompanyInput {
        name: input.name.trim().to_string(),
        description: input.description.filter(|d| !d.trim().is_empty()),
        logo: input.logo.filter(|l| !l.trim().is_empty()),
    })
}

/// GET /api/v1/companies
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<CompanyWithCounts>>>> {
    let companies = CompanyRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: companies }))
}

/// POST /api/v1/companies
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<CompanyInput>,
) -> AppResult<(StatusCode, Json<DataResponse<CompanyWithCounts>>)> {
    let input = normalize(input)?;
    let company = CompanyRepo::create(&state.pool, &input).await?;
    tracing::info!(company_id = company.id, "Company created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: company })))
}

/// PUT /api/v1/companies/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<CompanyInput>,
) -> AppResult<Json<DataResponse<CompanyWithCounts>>> {
    let input = normalize(input)?;
    let company = CompanyRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Company",
            id,
        }))?;
    Ok(Json(DataResponse { data: company }))
}

/// DELETE /api/v1/companies/{id}
///
/// Detaches the company's users and projects, then deletes it, in one
/// transaction.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CompanyDeleted>>> {
    let detached = CompanyRepo::delete_detaching(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Company",
            id,
        }))?;

    tracing::info!(
        company_id = id,
        deleted_by = admin.user_id,
        users = detached.users,
        projects = detached.projects,
        "Company deleted",
    );

    Ok(Json(DataResponse {
        data: CompanyDeleted {
            success: true,
            message: format!(
                "Company deleted. {} user(s) and {} project(s) detached.",
                detached.users, detached.projects
            ),
            detached_users: detached.users,
            detached_projects: detached.projects,
        },
    }))
}

//! Handler for bootstrapping the first administrator.

use axum::extract::State;
use axum::http::StatusCode;
use portal_core::error::CoreError;
use portal_core::project::require_non_blank;
use portal_core::roles::ROLE_ADMIN;
use portal_db::models::user::{CreateUser, UserResponse};
use portal_db::repositories::{RoleRepo, UserRepo};
use serde::Deserialize;
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::extract::Json;
use crate::handlers::users::user_to_response;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /setup/admin`.
#[derive(Debug, Deserialize, Validate)]
pub struct SetupAdminRequest {
    pub name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    pub password: String,
}

/// POST /api/v1/setup/admin
///
/// Unauthenticated. Only succeeds while no administrator exists.
pub async fn create_admin(
    State(state): State<AppState>,
    Json(input): Json<SetupAdminRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    input.validate()?;
    require_non_blank("name", &input.name)?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let admin_role = RoleRepo::find_by_name(&state.pool, ROLE_ADMIN)
        .await?
        .ok_or_else(|| AppError::InternalError("Admin role is not seeded".into()))?;

    if UserRepo::exists_with_role(&state.pool, admin_role.id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "An administrator already exists".into(),
        )));
    }
    if UserRepo::find_by_email(&state.pool, &input.email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "A user with this email already exists".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email: input.email,
            name: input.name.trim().to_string(),
            password_hash,
            role_id: admin_role.id,
            avatar: None,
            company_id: None,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "Initial administrator created");

    let data = user_to_response(&state.pool, user).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data })))
}

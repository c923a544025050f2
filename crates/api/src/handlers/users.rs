//! Handlers for the `/users` resource (user management).
//!
//! All handlers require the `admin` role via [`RequireAdmin`].

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use portal_core::error::CoreError;
use portal_core::project::{require_non_blank, validate_known_value};
use portal_core::roles::{ROLE_CLIENT, VALID_ROLES};
use portal_core::types::DbId;
use portal_db::models::user::{CreateUser, UpdateUser, User, UserResponse};
use portal_db::repositories::{CompanyRepo, RoleRepo, UserRepo};
use serde::Deserialize;
use sqlx::PgPool;
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::extract::{Json, Query};
use crate::middleware::rbac::RequireAdmin;
use crate::response::{DataResponse, SuccessMessage};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /users`.
#[derive(Debug, Deserialize)]
pub struct UserListParams {
    pub role: Option<String>,
}

/// Request body for `POST /users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    pub name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    pub password: String,
    pub role: Option<String>,
    pub company_id: Option<DbId>,
    pub avatar: Option<String>,
}

/// Request body for `PUT /users/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    pub name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    /// Re-hashed only when present and non-empty.
    pub password: Option<String>,
    pub role: Option<String>,
    pub company_id: Option<DbId>,
}

/// Request body for `PUT /users/{id}/avatar`.
#[derive(Debug, Deserialize)]
pub struct AvatarRequest {
    pub avatar: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/users?role=
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<UserListParams>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let role_id = match params.role.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
        Some(name) => Some(role_id_for(&state.pool, &name.to_lowercase()).await?),
        None => None,
    };

    let users = UserRepo::list(&state.pool, role_id).await?;
    let data = users_to_responses(&state.pool, users).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/users
///
/// Role defaults to `client`. Returns 409 if the email is already registered.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    input.validate()?;
    require_non_blank("name", &input.name)?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let role = input.role.as_deref().unwrap_or(ROLE_CLIENT).to_lowercase();
    let role_id = role_id_for(&state.pool, &role).await?;
    ensure_company_exists(&state.pool, input.company_id).await?;

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
            role_id,
            avatar: input.avatar,
            company_id: input.company_id,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, created_by = admin.user_id, role = %role, "User created");

    let data = user_to_response(&state.pool, user).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data })))
}

/// PUT /api/v1/users/{id}
///
/// Replaces name, email, role (default `client`), and company. The password
/// is changed only when a non-empty one is supplied.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUserRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    input.validate()?;
    require_non_blank("name", &input.name)?;

    ensure_user_exists(&state.pool, id).await?;

    if UserRepo::email_taken_by_other(&state.pool, &input.email, id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "A user with this email already exists".into(),
        )));
    }

    let role = input.role.as_deref().unwrap_or(ROLE_CLIENT).to_lowercase();
    let role_id = role_id_for(&state.pool, &role).await?;
    ensure_company_exists(&state.pool, input.company_id).await?;

    if let Some(password) = input.password.as_deref().filter(|p| !p.is_empty()) {
        validate_password_strength(password, MIN_PASSWORD_LENGTH)
            .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
        let hashed = hash_password(password)
            .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
        UserRepo::update_password(&state.pool, id, &hashed).await?;
    }

    let user = UserRepo::update(
        &state.pool,
        id,
        &UpdateUser {
            email: input.email,
            name: input.name.trim().to_string(),
            role_id,
            company_id: input.company_id,
        },
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    let data = user_to_response(&state.pool, user).await?;
    Ok(Json(DataResponse { data }))
}

/// DELETE /api/v1/users/{id}
///
/// An administrator cannot delete their own account.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<SuccessMessage>>> {
    if id == admin.user_id {
        return Err(AppError::Core(CoreError::Validation(
            "You cannot delete your own account".into(),
        )));
    }

    if !UserRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "User", id }));
    }

    tracing::info!(user_id = id, deleted_by = admin.user_id, "User deleted");
    Ok(Json(DataResponse {
        data: SuccessMessage::new("User deleted"),
    }))
}

/// PUT /api/v1/users/{id}/avatar
pub async fn update_avatar(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<AvatarRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let avatar = input.avatar.as_deref().map(str::trim).filter(|a| !a.is_empty());
    let user = UserRepo::update_avatar(&state.pool, id, avatar)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    let data = user_to_response(&state.pool, user).await?;
    Ok(Json(DataResponse { data }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve a role name to its id. Unknown names are a validation error.
async fn role_id_for(pool: &PgPool, role: &str) -> AppResult<DbId> {
    validate_known_value(role, VALID_ROLES, "role")?;
    let role = RoleRepo::find_by_name(pool, role)
        .await?
        .ok_or_else(|| AppError::InternalError(format!("Role '{role}' is not seeded")))?;
    Ok(role.id)
}

async fn ensure_user_exists(pool: &PgPool, id: DbId) -> AppResult<()> {
    UserRepo::find_by_id(pool, id)
        .await?
        .map(|_| ())
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))
}

pub(crate) async fn ensure_company_exists(pool: &PgPool, id: Option<DbId>) -> AppResult<()> {
    let Some(id) = id else {
        return Ok(());
    };
    CompanyRepo::find_by_id(pool, id)
        .await?
        .map(|_| ())
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Company",
            id,
        }))
}

/// Convert a single [`User`] into a [`UserResponse`].
pub(crate) async fn user_to_response(pool: &PgPool, user: User) -> AppResult<UserResponse> {
    users_to_responses(pool, vec![user])
        .await?
        .pop()
        .ok_or_else(|| AppError::InternalError("User response conversion failed".into()))
}

/// Convert users into [`UserResponse`]s, resolving role names and company
/// summaries with one query each.
pub(crate) async fn users_to_responses(
    pool: &PgPool,
    users: Vec<User>,
) -> AppResult<Vec<UserResponse>> {
    let roles: HashMap<DbId, String> = RoleRepo::list(pool)
        .await?
        .into_iter()
        .map(|r| (r.id, r.name))
        .collect();

    let mut company_ids: Vec<DbId> = users.iter().filter_map(|u| u.company_id).collect();
    company_ids.sort_unstable();
    company_ids.dedup();
    let companies: HashMap<DbId, _> = CompanyRepo::list_summaries(pool, &company_ids)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    Ok(users
        .into_iter()
        .map(|user| UserResponse {
            role: roles.get(&user.role_id).cloned().unwrap_or_default(),
            company: user.company_id.and_then(|id| companies.get(&id).cloned()),
            id: user.id,
            email: user.email,
            name: user.name,
            role_id: user.role_id,
            avatar: user.avatar,
            company_id: user.company_id,
            created_at: user.created_at,
        })
        .collect())
}

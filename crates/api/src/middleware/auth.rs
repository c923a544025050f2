//! Session-token authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use portal_core::error::CoreError;
use portal_core::roles::is_elevated;
use portal_core::types::DbId;
use portal_db::models::project::{Project, ProjectScope};
use portal_db::repositories::{RoleRepo, UserRepo};

use crate::auth::cookie::extract_token;
use crate::auth::jwt::validate_token;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// The authenticated caller, loaded fresh from the database on every request.
///
/// The token only identifies the user; `role` and `company_id` come from the
/// current `users` row, so a demoted user loses access immediately.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub email: String,
    pub name: String,
    /// Role name resolved from `roles` (e.g. `"admin"`, `"client"`).
    pub role: String,
    pub company_id: Option<DbId>,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        is_elevated(&self.role)
    }

    /// The set of projects this caller may read.
    pub fn project_scope(&self) -> ProjectScope {
        if self.is_admin() {
            ProjectScope::All
        } else {
            ProjectScope::VisibleTo {
                user_id: self.user_id,
                company_id: self.company_id,
            }
        }
    }

    /// Fail with 403 unless the caller may read `project`.
    pub fn ensure_can_view(&self, project: &Project) -> AppResult<()> {
        if self.project_scope().permits(project) {
            Ok(())
        } else {
            Err(AppError::Core(CoreError::Forbidden(
                "You do not have access to this project".into(),
            )))
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers).ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Authentication required".into()))
        })?;

        let claims = validate_token(&token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        let user = UserRepo::find_by_id(&state.pool, claims.sub)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("User no longer exists".into()))
            })?;

        let role = RoleRepo::resolve_name(&state.pool, user.role_id)
            .await?
            .ok_or_else(|| {
                AppError::InternalError(format!("User {} has unknown role_id", user.id))
            })?;

        if role != claims.role {
            tracing::debug!(
                user_id = user.id,
                claimed = %claims.role,
                current = %role,
                "Token role is stale; using current role",
            );
        }

        Ok(AuthUser {
            user_id: user.id,
            email: user.email,
            name: user.name,
            role,
            company_id: user.company_id,
        })
    }
}

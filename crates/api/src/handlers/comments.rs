//! Handlers for project comments.
//!
//! Any authenticated user may read and post, limited to projects they can see.

use axum::extract::State;
use axum::http::StatusCode;
use portal_core::project::require_non_blank;
use portal_core::types::{DbId, Timestamp};
use portal_db::models::comment::CommentWithAuthor;
use portal_db::repositories::CommentRepo;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::extract::{Json, Query};
use crate::handlers::projects::find_project;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /comments`.
#[derive(Debug, Deserialize)]
pub struct CommentListParams {
    pub project_id: DbId,
}

/// Request body for `POST /comments`.
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub project_id: DbId,
    pub content: String,
}

/// Author summary embedded in a comment.
#[derive(Debug, Serialize)]
pub struct CommentAuthor {
    pub id: DbId,
    pub name: String,
    pub role: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CommentView {
    pub id: DbId,
    pub project_id: DbId,
    pub content: String,
    pub created_at: Timestamp,
    pub user: CommentAuthor,
}

impl From<CommentWithAuthor> for CommentView {
    fn from(row: CommentWithAuthor) -> Self {
        Self {
            id: row.id,
            project_id: row.project_id,
            content: row.content,
            created_at: row.created_at,
            user: CommentAuthor {
                id: row.user_id,
                name: row.user_name,
                role: row.user_role,
                avatar: row.user_avatar,
            },
        }
    }
}

/// GET /api/v1/comments?project_id={id}
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<CommentListParams>,
) -> AppResult<Json<DataResponse<Vec<CommentView>>>> {
    let project = find_project(&state.pool, params.project_id).await?;
    user.ensure_can_view(&project)?;

    let comments = CommentRepo::list_by_project(&state.pool, project.id).await?;
    Ok(Json(DataResponse {
        data: comments.into_iter().map(CommentView::from).collect(),
    }))
}

/// POST /api/v1/comments
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(input): Json<CreateCommentRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<CommentView>>)> {
    require_non_blank("content", &input.content)?;

    let project = find_project(&state.pool, input.project_id).await?;
    user.ensure_can_view(&project)?;

    let comment =
        CommentRepo::create(&state.pool, project.id, user.user_id, input.content.trim()).await?;

    tracing::info!(
        comment_id = comment.id,
        project_id = project.id,
        user_id = user.user_id,
        "Comment posted",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: comment.into(),
        }),
    ))
}

//! Handlers for support tickets and the contact form.
//!
//! Administrators see and triage every ticket. Other users see only the
//! tickets they opened and may reply to those.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use portal_core::error::CoreError;
use portal_core::project::require_non_blank;
use portal_core::ticket::{
    contact_subject, validate_ticket_body, validate_ticket_priority, validate_ticket_status,
    DEFAULT_PRIORITY, TICKET_STATUS_OPEN,
};
use portal_core::types::{DbId, Timestamp};
use portal_db::models::ticket::{CreateTicket, TicketListRow, TicketReply, UpdateTicket};
use portal_db::repositories::{TicketReplyRepo, TicketRepo};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::extract::Json;
use crate::handlers::projects::find_project;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /tickets`.
#[derive(Debug, Deserialize)]
pub struct CreateTicketRequest {
    pub subject: String,
    pub message: String,
    pub project_id: Option<DbId>,
    pub priority: Option<String>,
}

/// Request body for `POST /contact`.
#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub subject: String,
    pub message: String,
    pub project_id: Option<DbId>,
}

/// Request body for `PATCH /tickets/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateTicketRequest {
    pub status: Option<String>,
    pub priority: Option<String>,
}

/// Request body for `POST /tickets/{id}/responses`.
#[derive(Debug, Deserialize)]
pub struct ReplyRequest {
    pub message: String,
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct TicketAuthor {
    pub id: DbId,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct TicketProject {
    pub id: DbId,
    pub name: String,
}

/// A ticket with its author, project, and replies (oldest first).
#[derive(Debug, Serialize)]
pub struct TicketView {
    pub id: DbId,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub priority: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub user: TicketAuthor,
    pub project: Option<TicketProject>,
    pub responses: Vec<TicketReply>,
}

impl TicketView {
    fn new(row: TicketListRow, responses: Vec<TicketReply>) -> Self {
        let project = match (row.project_id, row.project_name) {
            (Some(id), Some(name)) => Some(TicketProject { id, name }),
            _ => None,
        };
        Self {
            id: row.id,
            subject: row.subject,
            message: row.message,
            status: row.status,
            priority: row.priority,
            created_at: row.created_at,
            updated_at: row.updated_at,
            user: TicketAuthor {
                id: row.user_id,
                name: row.user_name,
                email: row.user_email,
            },
            project,
            responses,
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/tickets
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<TicketView>>>> {
    let owner = (!user.is_admin()).then_some(user.user_id);
    let rows = TicketRepo::list(&state.pool, owner).await?;

    let ids: Vec<DbId> = rows.iter().map(|t| t.id).collect();
    let mut replies: HashMap<DbId, Vec<TicketReply>> = HashMap::new();
    for reply in TicketReplyRepo::list_by_tickets(&state.pool, &ids).await? {
        replies.entry(reply.ticket_id).or_default().push(reply);
    }

    let data = rows
        .into_iter()
        .map(|row| {
            let responses = replies.remove(&row.id).unwrap_or_default();
            TicketView::new(row, responses)
        })
        .collect();
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/tickets
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(input): Json<CreateTicketRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<TicketView>>)> {
    validate_ticket_body(&input.subject, &input.message)?;
    let priority = input
        .priority
        .unwrap_or_else(|| DEFAULT_PRIORITY.to_string());
    validate_ticket_priority(&priority)?;
    ensure_project_visible(&state.pool, &user, input.project_id).await?;

    let view = open_ticket(
        &state.pool,
        CreateTicket {
            subject: input.subject.trim().to_string(),
            message: input.message.trim().to_string(),
            status: None,
            priority,
            user_id: user.user_id,
            project_id: input.project_id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: view })))
}

/// POST /api/v1/contact
///
/// Contact-form submissions are stored as ordinary tickets with a
/// `[CONTACT] ` subject prefix.
pub async fn contact(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(input): Json<ContactRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<TicketView>>)> {
    validate_ticket_body(&input.subject, &input.message)?;
    ensure_project_visible(&state.pool, &user, input.project_id).await?;

    let view = open_ticket(
        &state.pool,
        CreateTicket {
            subject: contact_subject(&input.subject),
            message: input.message.trim().to_string(),
            status: Some(TICKET_STATUS_OPEN.to_string()),
            priority: DEFAULT_PRIORITY.to_string(),
            user_id: user.user_id,
            project_id: input.project_id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: view })))
}

/// PATCH /api/v1/tickets/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTicketRequest>,
) -> AppResult<Json<DataResponse<TicketView>>> {
    if input.status.is_none() && input.priority.is_none() {
        return Err(AppError::Core(CoreError::Validation(
            "Provide a status or a priority".into(),
        )));
    }
    if let Some(status) = input.status.as_deref() {
        validate_ticket_status(status)?;
    }
    if let Some(priority) = input.priority.as_deref() {
        validate_ticket_priority(priority)?;
    }

    TicketRepo::update(
        &state.pool,
        id,
        &UpdateTicket {
            status: input.status,
            priority: input.priority,
        },
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "Ticket",
        id,
    }))?;

    tracing::info!(ticket_id = id, updated_by = admin.user_id, "Ticket updated");

    let view = load_view(&state.pool, id).await?;
    Ok(Json(DataResponse { data: view }))
}

/// POST /api/v1/tickets/{id}/responses
pub async fn reply(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<ReplyRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<TicketReply>>)> {
    require_non_blank("Message", &input.message)?;

    let ticket = TicketRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Ticket",
            id,
        }))?;
    if !user.is_admin() && ticket.user_id != user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You can only reply to your own tickets".into(),
        )));
    }

    let reply =
        TicketReplyRepo::create(&state.pool, id, user.user_id, input.message.trim()).await?;

    tracing::info!(ticket_id = id, reply_id = reply.id, user_id = user.user_id, "Ticket reply added");
    Ok((StatusCode::CREATED, Json(DataResponse { data: reply })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn ensure_project_visible(
    pool: &PgPool,
    user: &AuthUser,
    project_id: Option<DbId>,
) -> AppResult<()> {
    if let Some(project_id) = project_id {
        let project = find_project(pool, project_id).await?;
        user.ensure_can_view(&project)?;
    }
    Ok(())
}

async fn open_ticket(pool: &PgPool, input: CreateTicket) -> AppResult<TicketView> {
    let ticket = TicketRepo::create(pool, &input).await?;
    tracing::info!(
        ticket_id = ticket.id,
        user_id = ticket.user_id,
        priority = %ticket.priority,
        "Ticket opened",
    );
    load_view(pool, ticket.id).await
}

async fn load_view(pool: &PgPool, id: DbId) -> AppResult<TicketView> {
    let row = TicketRepo::find_listed(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Ticket",
            id,
        }))?;
    let responses = TicketReplyRepo::list_by_tickets(pool, &[id]).await?;
    Ok(TicketView::new(row, responses))
}

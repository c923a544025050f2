//! Support ticket models and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use portal_core::types::{DbId, Timestamp};

/// A ticket row from the `tickets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Ticket {
    pub id: DbId,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub priority: String,
    pub user_id: DbId,
    pub project_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A ticket joined with its author and project names, for listings.
#[derive(Debug, Clone, FromRow)]
pub struct TicketListRow {
    pub id: DbId,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub priority: String,
    pub user_id: DbId,
    pub project_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub user_name: String,
    pub user_email: String,
    pub project_name: Option<String>,
}

/// DTO for creating a ticket.
#[derive(Debug, Clone)]
pub struct CreateTicket {
    pub subject: String,
    pub message: String,
    pub status: Option<String>,
    pub priority: String,
    pub user_id: DbId,
    pub project_id: Option<DbId>,
}

/// DTO for triaging a ticket. `None` keeps the stored value.
#[derive(Debug, Clone)]
pub struct UpdateTicket {
    pub status: Option<String>,
    pub priority: Option<String>,
}

/// A reply on a ticket, joined with its author.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TicketReply {
    pub id: DbId,
    pub ticket_id: DbId,
    pub user_id: DbId,
    pub message: String,
    pub created_at: Timestamp,
    pub user_name: String,
    pub user_role: String,
}

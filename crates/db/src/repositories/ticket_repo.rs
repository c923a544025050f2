//! Repositories for the `tickets` and `ticket_responses` tables.

use sqlx::PgPool;
use portal_core::ticket::TICKET_STATUS_OPEN;
use portal_core::types::DbId;

use crate::models::ticket::{CreateTicket, Ticket, TicketListRow, TicketReply, UpdateTicket};

const COLUMNS: &str = "id, subject, message, status, priority, user_id, project_id, \
                        created_at, updated_at";

/// Ticket columns (aliased `t`) joined with author and project names.
const LIST_COLUMNS: &str = "t.id, t.subject, t.message, t.status, t.priority, t.user_id, \
                             t.project_id, t.created_at, t.updated_at, \
                             u.name AS user_name, u.email AS user_email, \
                             p.name AS project_name";

pub struct TicketRepo;

impl TicketRepo {
    /// Insert a ticket. Status defaults to `OPEN`.
    pub async fn create(pool: &PgPool, input: &CreateTicket) -> Result<Ticket, sqlx::Error> {
        let query = format!(
            "INSERT INTO tickets (subject, message, status, priority, user_id, project_id)
             VALUES ($1, $2, COALESCE($3, '{TICKET_STATUS_OPEN}'), $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(&input.subject)
            .bind(&input.message)
            .bind(&input.status)
            .bind(&input.priority)
            .bind(input.user_id)
            .bind(input.project_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tickets WHERE id = $1");
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find one ticket with its author and project names.
    pub async fn find_listed(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TicketListRow>, sqlx::Error> {
        let query = format!(
            "SELECT {LIST_COLUMNS}
             FROM tickets t
             JOIN users u ON u.id = t.user_id
             LEFT JOIN projects p ON p.id = t.project_id
             WHERE t.id = $1"
        );
        sqlx::query_as::<_, TicketListRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List tickets, most recently updated first. `owner = Some(id)` restricts the list to
    /// tickets that user opened.
    pub async fn list(
        pool: &PgPool,
        owner: Option<DbId>,
    ) -> Result<Vec<TicketListRow>, sqlx::Error> {
        let query = format!(
            "SELECT {LIST_COLUMNS}
             FROM tickets t
             JOIN users u ON u.id = t.user_id
             LEFT JOIN projects p ON p.id = t.project_id
             WHERE ($1::BIGINT IS NULL OR t.user_id = $1)
             ORDER BY t.updated_at DESC, t.id DESC"
        );
        sqlx::query_as::<_, TicketListRow>(&query)
            .bind(owner)
            .fetch_all(pool)
            .await
    }

    /// Apply a triage update. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTicket,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!(
            "UPDATE tickets SET
                status = COALESCE($2, status),
                priority = COALESCE($3, priority)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .bind(&input.status)
            .bind(&input.priority)
            .fetch_optional(pool)
            .await
    }
}

/// Reply columns (aliased `r`) joined with the author's name and role.
const REPLY_COLUMNS: &str = "r.id, r.ticket_id, r.user_id, r.message, r.created_at, \
                              u.name AS user_name, ro.name AS user_role";

pub struct TicketReplyRepo;

impl TicketReplyRepo {
    /// Append a reply to a ticket and return it with its author.
    pub async fn create(
        pool: &PgPool,
        ticket_id: DbId,
        user_id: DbId,
        message: &str,
    ) -> Result<TicketReply, sqlx::Error> {
        let query = format!(
            "WITH r AS (
                INSERT INTO ticket_responses (ticket_id, user_id, message)
                VALUES ($1, $2, $3)
                RETURNING id, ticket_id, user_id, message, created_at
             )
             SELECT {REPLY_COLUMNS}
             FROM r
             JOIN users u ON u.id = r.user_id
             JOIN roles ro ON ro.id = u.role_id"
        );
        sqlx::query_as::<_, TicketReply>(&query)
            .bind(ticket_id)
            .bind(user_id)
            .bind(message)
            .fetch_one(pool)
            .await
    }

    /// Replies for a set of tickets, oldest first within each ticket.
    pub async fn list_by_tickets(
        pool: &PgPool,
        ticket_ids: &[DbId],
    ) -> Result<Vec<TicketReply>, sqlx::Error> {
        let query = format!(
            "SELECT {REPLY_COLUMNS}
             FROM ticket_responses r
             JOIN users u ON u.id = r.user_id
             JOIN roles ro ON ro.id = u.role_id
             WHERE r.ticket_id = ANY($1)
             ORDER BY r.ticket_id, r.created_at, r.id"
        );
        sqlx::query_as::<_, TicketReply>(&query)
            .bind(ticket_ids)
            .fetch_all(pool)
            .await
    }
}

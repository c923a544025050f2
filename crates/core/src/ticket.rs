//! Support ticket enumerations and validation.

use crate::error::CoreError;
use crate::project::{require_non_blank, validate_known_value};

pub const TICKET_STATUS_OPEN: &str = "OPEN";
pub const TICKET_STATUS_IN_PROGRESS: &str = "IN_PROGRESS";
pub const TICKET_STATUS_RESOLVED: &str = "RESOLVED";
pub const TICKET_STATUS_CLOSED: &str = "CLOSED";

/// All valid ticket statuses. Must match the `ck_tickets_status` constraint.
pub const VALID_TICKET_STATUSES: &[&str] = &[
    TICKET_STATUS_OPEN,
    TICKET_STATUS_IN_PROGRESS,
    TICKET_STATUS_RESOLVED,
    TICKET_STATUS_CLOSED,
];

pub const PRIORITY_LOW: &str = "LOW";
pub const PRIORITY_MEDIUM: &str = "MEDIUM";
pub const PRIORITY_HIGH: &str = "HIGH";
pub const PRIORITY_URGENT: &str = "URGENT";

/// All valid ticket priorities. Must match the `ck_tickets_priority` constraint.
pub const VALID_TICKET_PRIORITIES: &[&str] =
    &[PRIORITY_LOW, PRIORITY_MEDIUM, PRIORITY_HIGH, PRIORITY_URGENT];

/// Priority assigned when none is supplied.
pub const DEFAULT_PRIORITY: &str = PRIORITY_MEDIUM;

/// Subject prefix marking tickets raised through the contact form.
pub const CONTACT_SUBJECT_PREFIX: &str = "[CONTACT] ";

pub fn validate_ticket_status(status: &str) -> Result<(), CoreError> {
    validate_known_value(status, VALID_TICKET_STATUSES, "ticket status")
}

pub fn validate_ticket_priority(priority: &str) -> Result<(), CoreError> {
    validate_known_value(priority, VALID_TICKET_PRIORITIES, "ticket priority")
}

/// Validate the subject and message of a new ticket.
pub fn validate_ticket_body(subject: &str, message: &str) -> Result<(), CoreError> {
    require_non_blank("Subject", subject)?;
    require_non_blank("Message", message)
}

/// Build the stored subject for a contact-form ticket.
pub fn contact_subject(subject: &str) -> String {
    format!("{CONTACT_SUBJECT_PREFIX}{}", subject.trim())
}

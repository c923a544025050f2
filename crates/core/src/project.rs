//! Project, step, and action enumerations and input validation.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Project status
// ---------------------------------------------------------------------------

pub const STATUS_NOT_STARTED: &str = "NOT_STARTED";
pub const STATUS_IN_PROGRESS: &str = "IN_PROGRESS";
pub const STATUS_COMPLETED: &str = "COMPLETED";
pub const STATUS_ON_HOLD: &str = "ON_HOLD";
pub const STATUS_CANCELLED: &str = "CANCELLED";

/// All valid project statuses. Must match the `ck_projects_status` constraint.
pub const VALID_PROJECT_STATUSES: &[&str] = &[
    STATUS_NOT_STARTED,
    STATUS_IN_PROGRESS,
    STATUS_COMPLETED,
    STATUS_ON_HOLD,
    STATUS_CANCELLED,
];

// ---------------------------------------------------------------------------
// Action type
// ---------------------------------------------------------------------------

/// Action owed by the client (counterparty-facing).
pub const ACTION_TYPE_CLIENT: &str = "CLIENT";
/// Action owed by the operator team.
pub const ACTION_TYPE_LEXIA: &str = "LEXIA";

/// All valid action types. Must match the `ck_project_actions_type` constraint.
pub const VALID_ACTION_TYPES: &[&str] = &[ACTION_TYPE_CLIENT, ACTION_TYPE_LEXIA];

/// Maximum project name length in characters.
pub const MAX_PROJECT_NAME_LENGTH: usize = 200;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate that a value is present in a known list, returning a
/// descriptive error if not.
pub fn validate_known_value(value: &str, valid: &[&str], label: &str) -> Result<(), CoreError> {
    if valid.contains(&value) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid {label} '{value}'. Must be one of: {valid:?}"
        )))
    }
}

/// Validate a project status string.
pub fn validate_project_status(status: &str) -> Result<(), CoreError> {
    validate_known_value(status, VALID_PROJECT_STATUSES, "project status")
}

/// Validate an action type string.
pub fn validate_action_type(action_type: &str) -> Result<(), CoreError> {
    validate_known_value(action_type, VALID_ACTION_TYPES, "action type")
}

/// Reject empty or whitespace-only required text fields.
pub fn require_non_blank(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    Ok(())
}

/// Validate a project name: non-blank and within the length limit.
pub fn validate_project_name(name: &str) -> Result<(), CoreError> {
    require_non_blank("Project name", name)?;
    if name.chars().count() > MAX_PROJECT_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Project name must be at most {MAX_PROJECT_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Zero-based position of the item at `index` in a submitted list.
pub fn sort_order_for(index: usize) -> i32 {
    i32::try_from(index).unwrap_or(i32::MAX)
}

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing, malformed, or expired credential, or a credential whose
    /// subject no longer resolves to a user.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated caller without the required role or visibility.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A third-party integration (remote storage) has no configuration.
    #[error("Integration not configured: {0}")]
    IntegrationNotConfigured(String),

    /// A call to a configured third-party integration failed.
    #[error("Integration failure: {0}")]
    IntegrationFailure(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

use std::sync::Arc;

use portal_core::file_sync::RemoteFileLister;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: portal_db::DbPool,
    /// Server configuration (JWT secret, cookie policy, timeouts).
    pub config: Arc<ServerConfig>,
    /// Remote folder lister used by file sync. `None` when no service
    /// account is configured.
    pub drive: Option<Arc<dyn RemoteFileLister>>,
}

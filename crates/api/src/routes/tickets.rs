//! Route definitions for the `/tickets` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::tickets;
use crate::state::AppState;

/// Routes mounted at `/tickets`.
///
/// ```text
/// GET   /                   -> list (admin: all, others: own)
/// POST  /                   -> create
/// PATCH /{id}               -> update (admin)
/// POST  /{id}/responses     -> reply (admin or ticket owner)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tickets::list).post(tickets::create))
        .route("/{id}", patch(tickets::update))
        .route("/{id}/responses", post(tickets::reply))
}

//! Route definitions for the `/companies` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::companies;
use crate::state::AppState;

/// Routes mounted at `/companies`. All require the admin role.
///
/// ```text
/// GET    /        -> list
/// POST   /        -> create
/// PUT    /{id}    -> update
/// DELETE /{id}    -> delete (detaches users and projects)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(companies::list).post(companies::create))
        .route("/{id}", put(companies::update).delete(companies::delete))
}

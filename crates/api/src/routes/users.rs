//! Route definitions for the `/users` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`. All require the admin role.
///
/// ```text
/// GET    /              -> list (?role=admin|client)
/// POST   /              -> create
/// PUT    /{id}          -> update
/// DELETE /{id}          -> delete
/// PUT    /{id}/avatar   -> update_avatar
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list).post(users::create))
        .route("/{id}", put(users::update).delete(users::delete))
        .route("/{id}/avatar", put(users::update_avatar))
}

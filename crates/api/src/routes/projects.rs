//! Route definitions for the `/projects` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::{files, projects, steps};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                          -> list (scoped to caller)
/// POST   /                          -> create (admin)
/// GET    /{id}                      -> get_by_id
/// PUT    /{id}                      -> update (admin)
/// DELETE /{id}                      -> delete (admin)
///
/// PATCH  /{id}/steps/{step_id}      -> steps::toggle (admin)
///
/// GET    /{id}/files                -> files::list
/// POST   /{id}/sync-files           -> files::sync (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list).post(projects::create))
        .route(
            "/{id}",
            get(projects::get_by_id)
                .put(projects::update)
                .delete(projects::delete),
        )
        .route("/{id}/steps/{step_id}", patch(steps::toggle))
        .route("/{id}/files", get(files::list))
        .route("/{id}/sync-files", post(files::sync))
}

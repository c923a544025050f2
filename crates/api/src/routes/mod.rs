pub mod auth;
pub mod comments;
pub mod companies;
pub mod health;
pub mod projects;
pub mod setup;
pub mod tickets;
pub mod users;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
/// /auth/logout                                     logout (public)
/// /auth/me                                         current user
///
/// /setup/admin                                     bootstrap first admin (public)
///
/// /companies                                       list, create (admin only)
/// /companies/{id}                                  update, delete
///
/// /users                                           list, create (admin only)
/// /users/{id}                                      update, delete
/// /users/{id}/avatar                               set avatar (PUT)
///
/// /projects                                        list, create
/// /projects/{id}                                   get, update, delete
/// /projects/{id}/steps/{step_id}                   toggle completion (PATCH)
/// /projects/{id}/files                             list files
/// /projects/{id}/sync-files                        sync from Drive (POST)
///
/// /tickets                                         list, create
/// /tickets/{id}                                    triage (PATCH, admin only)
/// /tickets/{id}/responses                          reply (POST)
/// /contact                                         contact form (POST)
///
/// /comments                                        list (?project_id=), create
///
/// /search                                          search (?q=)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/setup", setup::router())
        .nest("/companies", companies::router())
        .nest("/users", users::router())
        // Projects, with steps and files as sub-resources.
        .nest("/projects", projects::router())
        .nest("/tickets", tickets::router())
        .route("/contact", post(handlers::tickets::contact))
        .nest("/comments", comments::router())
        .route("/search", get(handlers::search::search))
}

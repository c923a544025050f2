use axum::routing::post;
use axum::Router;

use crate::handlers::setup;
use crate::state::AppState;

/// Routes mounted at `/setup`.
///
/// ```text
/// POST /admin    -> create_admin (only while no admin exists)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/admin", post(setup::create_admin))
}

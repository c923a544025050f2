use axum::routing::get;
use axum::Router;

use crate::handlers::comments;
use crate::state::AppState;

/// Routes mounted at `/comments`.
///
/// ```text
/// GET  /?project_id={id}   -> list
/// POST /                   -> create
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(comments::list).post(comments::create))
}

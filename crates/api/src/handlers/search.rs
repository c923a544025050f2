//! Handler for portal-wide search.

use axum::extract::State;
use portal_db::models::search::{ActionHit, ProjectHit, TicketHit};
use portal_db::repositories::SearchRepo;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::extract::{Json, Query};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Maximum hits returned per category.
const SEARCH_LIMIT: i64 = 10;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// Hits grouped by category. A blank query leaves every category absent.
#[derive(Debug, Default, Serialize)]
pub struct SearchResults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<ProjectHit>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<ActionHit>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickets: Option<Vec<TicketHit>>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: SearchResults,
}

/// GET /api/v1/search?q={term}
///
/// Case-insensitive substring match over projects, actions, and tickets.
/// Non-admins only see hits from projects they can view and their own
/// tickets.
pub async fn search(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<DataResponse<SearchResponse>>> {
    let term = params.q.as_deref().map(str::trim).unwrap_or_default();
    if term.is_empty() {
        return Ok(Json(DataResponse {
            data: SearchResponse {
                results: SearchResults::default(),
            },
        }));
    }

    let scope = user.project_scope();
    let owner = (!user.is_admin()).then_some(user.user_id);

    let projects = SearchRepo::projects(&state.pool, &scope, term, SEARCH_LIMIT).await?;
    let actions = SearchRepo::actions(&state.pool, &scope, term, SEARCH_LIMIT).await?;
    let tickets = SearchRepo::tickets(&state.pool, owner, term, SEARCH_LIMIT).await?;

    tracing::debug!(
        user_id = user.user_id,
        projects = projects.len(),
        actions = actions.len(),
        tickets = tickets.len(),
        "Search executed",
    );

    Ok(Json(DataResponse {
        data: SearchResponse {
            results: SearchResults {
                projects: Some(projects),
                actions: Some(actions),
                tickets: Some(tickets),
            },
        },
    }))
}

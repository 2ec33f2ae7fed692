//! Handler for full-text page search.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use folio_core::search::{clamp_limit, normalize_query, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT};
use folio_db::repositories::SearchRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub limit: Option<i64>,
}

/// GET /search?q=&limit=
///
/// Ranked search over the caller's organization.
pub async fn search_pages(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<impl IntoResponse> {
    let query = params
        .q
        .as_deref()
        .and_then(normalize_query)
        .ok_or_else(|| AppError::BadRequest("Query parameter 'q' is required".into()))?;
    let limit = clamp_limit(params.limit, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT);

    let results = SearchRepo::search(&state.pool, auth.org_id, query, limit).await?;

    tracing::debug!(org_id = %auth.org_id, hits = results.len(), "Search completed");

    Ok(Json(DataResponse { data: results }))
}

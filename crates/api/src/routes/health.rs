//! Root-level health probe for the page service.
//!
//! Reports the two stores every page mutation writes to: the page tables and
//! the search index. Either being unreachable makes the service unable to
//! commit a change, so the probe answers 503.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use folio_db::repositories::SearchRepo;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: &'static str,
    pub version: &'static str,
    pub database: bool,
    pub search_index: bool,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = folio_db::health_check(&state.pool).await.is_ok();
    let search_index = match SearchRepo::check(&state.pool).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Search index unreachable");
            false
        }
    };

    let healthy = database && search_index;
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            status: if healthy { "ok" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
            database,
            search_index,
        }),
    )
}

/// Mounted at the root, outside `/api/v1` and its authentication.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

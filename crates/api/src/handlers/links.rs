//! Handlers for reading the content link graph.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use folio_core::types::RefId;
use folio_db::repositories::ContentLinkRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /documents/{doc}/pages/{page}/links
///
/// Outgoing links of one page.
pub async fn list_page_links(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((document_id, page_id)): Path<(RefId, RefId)>,
) -> AppResult<impl IntoResponse> {
    let links =
        ContentLinkRepo::list_by_source_page(&state.pool, auth.org_id, document_id, page_id)
            .await?;
    Ok(Json(DataResponse { data: links }))
}

/// GET /documents/{doc}/links
///
/// Outgoing links of every page in a document.
pub async fn list_document_links(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(document_id): Path<RefId>,
) -> AppResult<impl IntoResponse> {
    let links =
        ContentLinkRepo::list_by_source_document(&state.pool, auth.org_id, document_id).await?;
    Ok(Json(DataResponse { data: links }))
}

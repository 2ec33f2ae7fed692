//! Handlers for page revision history.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use folio_core::error::CoreError;
use folio_core::types::{new_ref_id, RefId};
use folio_db::repositories::{PageRepo, RevisionRepo};
use folio_db::Scope;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireEditor;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /documents/{doc}/revisions
///
/// Section revisions of a document, newest first.
pub async fn list_document_revisions(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(document_id): Path<RefId>,
) -> AppResult<impl IntoResponse> {
    let revisions = RevisionRepo::list_by_document(&state.pool, auth.org_id, document_id).await?;
    Ok(Json(DataResponse { data: revisions }))
}

/// GET /documents/{doc}/pages/{page}/revisions
///
/// Section revisions of a page, newest first.
pub async fn list_page_revisions(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((document_id, page_id)): Path<(RefId, RefId)>,
) -> AppResult<impl IntoResponse> {
    let revisions =
        RevisionRepo::list_by_page(&state.pool, auth.org_id, document_id, page_id).await?;
    Ok(Json(DataResponse { data: revisions }))
}

/// GET /documents/{doc}/pages/{page}/revisions/{rev}
pub async fn get_page_revision(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((document_id, page_id, revision_id)): Path<(RefId, RefId, RefId)>,
) -> AppResult<impl IntoResponse> {
    let revision = RevisionRepo::find(&state.pool, auth.org_id, revision_id)
        .await?
        .filter(|r| r.document_id == document_id && r.page_id == page_id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Revision",
            id: revision_id,
        }))?;
    Ok(Json(DataResponse { data: revision }))
}

/// POST /documents/{doc}/pages/{page}/revisions/{rev}/restore
///
/// Put a revision's content back onto its page. The replaced content is
/// recorded as a new revision.
pub async fn restore_page_revision(
    RequireEditor(auth): RequireEditor,
    State(state): State<AppState>,
    Path((document_id, page_id, revision_id)): Path<(RefId, RefId, RefId)>,
) -> AppResult<impl IntoResponse> {
    let mut scope = Scope::begin(&state.pool, auth.context()).await?;
    let page = PageRepo::restore_revision(
        &mut scope,
        &state.search_index,
        document_id,
        page_id,
        revision_id,
        new_ref_id(),
    )
    .await?;
    scope.commit().await?;

    tracing::info!(
        org_id = %auth.org_id,
        user_id = %auth.user_id,
        document_id = %document_id,
        page_id = %page_id,
        revision_id = %revision_id,
        "Page revision restored"
    );

    Ok(Json(DataResponse { data: page }))
}

//! Handlers for document pages and their metadata.
//!
//! Every mutation runs in one [`Scope`]: the page rows, metadata, revision
//! snapshot, content links and search index entry commit together or not at
//! all.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use folio_core::error::CoreError;
use folio_core::pages::{
    validate_config, validate_level, validate_page_type, validate_sequence, validate_title,
    MAX_WHERE_IN_IDS,
};
use folio_core::types::{new_ref_id, RefId};
use folio_db::models::page::{CreatePage, Page, UpdatePage, UpdatePageLevel, UpdatePageSequence};
use folio_db::models::page_meta::{PageMeta, UpdatePageMeta};
use folio_db::repositories::{PageMetaRepo, PageRepo};
use folio_db::Scope;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireEditor;
use crate::response::DataResponse;
use crate::state::AppState;

/* --------------------------------------------------------------------------
Query param and response types
-------------------------------------------------------------------------- */

#[derive(Debug, Deserialize)]
pub struct ListPagesParams {
    /// Comma-separated page ids; restricts the listing to those pages.
    pub ids: Option<String>,
    /// `false` omits page bodies.
    pub content: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePageParams {
    #[serde(default)]
    pub skip_revision: bool,
}

#[derive(Debug, Deserialize)]
pub struct DocumentMetaParams {
    #[serde(default)]
    pub external_only: bool,
}

#[derive(Debug, Serialize)]
pub struct NextSequenceResponse {
    pub sequence: f64,
}

/* --------------------------------------------------------------------------
Helpers
-------------------------------------------------------------------------- */

fn page_not_found(id: RefId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Page", id })
}

/// Parse the `ids` query parameter.
fn parse_ids(raw: &str) -> AppResult<Vec<RefId>> {
    let ids = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            RefId::parse_str(s).map_err(|_| AppError::BadRequest(format!("Invalid page id '{s}'")))
        })
        .collect::<AppResult<Vec<_>>>()?;

    if ids.len() > MAX_WHERE_IN_IDS {
        return Err(AppError::BadRequest(format!(
            "At most {MAX_WHERE_IN_IDS} page ids may be requested at once"
        )));
    }
    Ok(ids)
}

fn validate_create(input: &CreatePage) -> Result<(), CoreError> {
    validate_title(&input.title)?;
    if let Some(ref page_type) = input.page_type {
        validate_page_type(page_type)?;
    }
    if let Some(level) = input.level {
        validate_level(level)?;
    }
    if let Some(sequence) = input.sequence {
        validate_sequence(sequence)?;
    }
    if let Some(config) = input.meta.as_ref().and_then(|m| m.config.as_ref()) {
        validate_config(config)?;
    }
    Ok(())
}

fn validate_update(input: &UpdatePage) -> Result<(), CoreError> {
    if let Some(ref title) = input.title {
        validate_title(title)?;
    }
    if let Some(level) = input.level {
        validate_level(level)?;
    }
    if let Some(sequence) = input.sequence {
        validate_sequence(sequence)?;
    }
    if let Some(meta) = input.meta.as_ref() {
        validate_meta(meta)?;
    }
    Ok(())
}

fn validate_meta(input: &UpdatePageMeta) -> Result<(), CoreError> {
    if let Some(ref config) = input.config {
        validate_config(config)?;
    }
    Ok(())
}

/* --------------------------------------------------------------------------
Reads
-------------------------------------------------------------------------- */

/// GET /documents/{doc}/pages
///
/// List a document's pages in display order. `?ids=` restricts the listing
/// to the named pages; `?content=false` omits bodies.
pub async fn list_pages(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(document_id): Path<RefId>,
    Query(params): Query<ListPagesParams>,
) -> AppResult<Response> {
    if let Some(ref raw) = params.ids {
        let ids = parse_ids(raw)?;
        let pages = PageRepo::list_where_in(&state.pool, auth.org_id, document_id, &ids).await?;
        return Ok(Json(DataResponse { data: pages }).into_response());
    }

    if params.content == Some(false) {
        let pages = PageRepo::list_summaries(&state.pool, auth.org_id, document_id).await?;
        return Ok(Json(DataResponse { data: pages }).into_response());
    }

    let pages = PageRepo::list_by_document(&state.pool, auth.org_id, document_id).await?;
    Ok(Json(DataResponse { data: pages }).into_response())
}

/// GET /documents/{doc}/pages/next-sequence
pub async fn get_next_sequence(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(document_id): Path<RefId>,
) -> AppResult<impl IntoResponse> {
    let sequence = PageRepo::next_sequence(&state.pool, auth.org_id, document_id).await?;
    Ok(Json(DataResponse {
        data: NextSequenceResponse { sequence },
    }))
}

/// GET /documents/{doc}/pages/{page}
pub async fn get_page(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((document_id, page_id)): Path<(RefId, RefId)>,
) -> AppResult<impl IntoResponse> {
    let page = PageRepo::find_in_document(&state.pool, auth.org_id, document_id, page_id)
        .await?
        .ok_or_else(|| page_not_found(page_id))?;
    Ok(Json(DataResponse { data: page }))
}

/* --------------------------------------------------------------------------
Mutations
-------------------------------------------------------------------------- */

/// POST /documents/{doc}/pages
///
/// Add a page (and its metadata) to a document. Without a sequence the page
/// is appended after the current last page.
pub async fn create_page(
    RequireEditor(auth): RequireEditor,
    State(state): State<AppState>,
    Path(document_id): Path<RefId>,
    Json(input): Json<CreatePage>,
) -> AppResult<impl IntoResponse> {
    validate_create(&input)?;

    let mut scope = Scope::begin(&state.pool, auth.context()).await?;
    let page = PageRepo::add(&mut scope, &state.search_index, document_id, &input).await?;
    scope.commit().await?;

    tracing::info!(
        org_id = %auth.org_id,
        user_id = %auth.user_id,
        document_id = %document_id,
        page_id = %page.ref_id,
        sequence = page.sequence,
        "Page added"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: page })))
}

/// PUT /documents/{doc}/pages/{page}
///
/// Update a page's content. The replaced state is kept as a revision unless
/// `?skip_revision=true`. Metadata supplied alongside is updated in the same
/// transaction.
pub async fn update_page(
    RequireEditor(auth): RequireEditor,
    State(state): State<AppState>,
    Path((document_id, page_id)): Path<(RefId, RefId)>,
    Query(params): Query<UpdatePageParams>,
    Json(input): Json<UpdatePage>,
) -> AppResult<impl IntoResponse> {
    validate_update(&input)?;

    let mut scope = Scope::begin(&state.pool, auth.context()).await?;
    let mut page: Page =
        PageRepo::find_in_document(scope.conn(), auth.org_id, document_id, page_id)
            .await?
            .ok_or_else(|| page_not_found(page_id))?;
    input.apply_to(&mut page);

    let revision_id = new_ref_id();
    let page = PageRepo::update(
        &mut scope,
        &state.search_index,
        &page,
        revision_id,
        auth.user_id,
        params.skip_revision,
    )
    .await?;

    if let Some(ref meta) = input.meta {
        PageMetaRepo::update(scope.conn(), auth.org_id, Some(auth.user_id), page_id, meta).await?;
    }
    scope.commit().await?;

    tracing::info!(
        org_id = %auth.org_id,
        user_id = %auth.user_id,
        document_id = %document_id,
        page_id = %page_id,
        revisions = page.revisions,
        skip_revision = params.skip_revision,
        "Page updated"
    );

    Ok(Json(DataResponse { data: page }))
}

/// PUT /documents/{doc}/pages/{page}/sequence
pub async fn update_page_sequence(
    RequireEditor(auth): RequireEditor,
    State(state): State<AppState>,
    Path((document_id, page_id)): Path<(RefId, RefId)>,
    Json(input): Json<UpdatePageSequence>,
) -> AppResult<impl IntoResponse> {
    validate_sequence(input.sequence)?;

    let mut scope = Scope::begin(&state.pool, auth.context()).await?;
    PageRepo::update_sequence(
        &mut scope,
        &state.search_index,
        document_id,
        page_id,
        input.sequence,
    )
    .await?;
    let page = PageRepo::find(scope.conn(), auth.org_id, page_id)
        .await?
        .ok_or_else(|| page_not_found(page_id))?;
    scope.commit().await?;

    tracing::info!(
        org_id = %auth.org_id,
        user_id = %auth.user_id,
        document_id = %document_id,
        page_id = %page_id,
        sequence = input.sequence,
        "Page sequence updated"
    );

    Ok(Json(DataResponse { data: page }))
}

/// PUT /documents/{doc}/pages/{page}/level
pub async fn update_page_level(
    RequireEditor(auth): RequireEditor,
    State(state): State<AppState>,
    Path((document_id, page_id)): Path<(RefId, RefId)>,
    Json(input): Json<UpdatePageLevel>,
) -> AppResult<impl IntoResponse> {
    validate_level(input.level)?;

    let mut scope = Scope::begin(&state.pool, auth.context()).await?;
    PageRepo::update_level(
        &mut scope,
        &state.search_index,
        document_id,
        page_id,
        input.level,
    )
    .await?;
    let page = PageRepo::find(scope.conn(), auth.org_id, page_id)
        .await?
        .ok_or_else(|| page_not_found(page_id))?;
    scope.commit().await?;

    tracing::info!(
        org_id = %auth.org_id,
        user_id = %auth.user_id,
        document_id = %document_id,
        page_id = %page_id,
        level = input.level,
        "Page level updated"
    );

    Ok(Json(DataResponse { data: page }))
}

/// DELETE /documents/{doc}/pages/{page}
///
/// Delete a page with its metadata, links and history. Links from other
/// pages that point at it are flagged as orphaned.
pub async fn delete_page(
    RequireEditor(auth): RequireEditor,
    State(state): State<AppState>,
    Path((document_id, page_id)): Path<(RefId, RefId)>,
) -> AppResult<impl IntoResponse> {
    let mut scope = Scope::begin(&state.pool, auth.context()).await?;
    PageRepo::delete(&mut scope, &state.search_index, document_id, page_id).await?;
    scope.commit().await?;

    tracing::info!(
        org_id = %auth.org_id,
        user_id = %auth.user_id,
        document_id = %document_id,
        page_id = %page_id,
        "Page deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}

/* --------------------------------------------------------------------------
Metadata
-------------------------------------------------------------------------- */

/// GET /documents/{doc}/pages/{page}/meta
pub async fn get_page_meta(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((document_id, page_id)): Path<(RefId, RefId)>,
) -> AppResult<impl IntoResponse> {
    let meta: PageMeta = PageMetaRepo::find(&state.pool, auth.org_id, page_id)
        .await?
        .filter(|m| m.document_id == document_id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "PageMeta",
            id: page_id,
        }))?;
    Ok(Json(DataResponse { data: meta }))
}

/// PUT /documents/{doc}/pages/{page}/meta
///
/// Update a page's raw body, config or external-source flag. The caller
/// becomes the metadata's recorded user.
pub async fn update_page_meta(
    RequireEditor(auth): RequireEditor,
    State(state): State<AppState>,
    Path((document_id, page_id)): Path<(RefId, RefId)>,
    Json(input): Json<UpdatePageMeta>,
) -> AppResult<impl IntoResponse> {
    validate_meta(&input)?;

    let mut scope = Scope::begin(&state.pool, auth.context()).await?;
    PageRepo::find_in_document(scope.conn(), auth.org_id, document_id, page_id)
        .await?
        .ok_or_else(|| page_not_found(page_id))?;
    let meta = PageMetaRepo::update(scope.conn(), auth.org_id, Some(auth.user_id), page_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "PageMeta",
            id: page_id,
        }))?;
    scope.commit().await?;

    tracing::info!(
        org_id = %auth.org_id,
        user_id = %auth.user_id,
        document_id = %document_id,
        page_id = %page_id,
        "Page meta updated"
    );

    Ok(Json(DataResponse { data: meta }))
}

/// GET /documents/{doc}/meta
///
/// Metadata of every page in a document; `?external_only=true` keeps only
/// externally sourced pages.
pub async fn list_document_meta(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(document_id): Path<RefId>,
    Query(params): Query<DocumentMetaParams>,
) -> AppResult<impl IntoResponse> {
    let meta =
        PageMetaRepo::list_by_document(&state.pool, auth.org_id, document_id, params.external_only)
            .await?;
    Ok(Json(DataResponse { data: meta }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ids_accepts_comma_separated_uuids() {
        let a = new_ref_id();
        let b = new_ref_id();
        let ids = parse_ids(&format!("{a}, {b},")).unwrap();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn parse_ids_rejects_garbage() {
        assert!(matches!(parse_ids("not-a-uuid"), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn parse_ids_caps_the_list() {
        let raw = (0..=MAX_WHERE_IN_IDS)
            .map(|_| new_ref_id().to_string())
            .collect::<Vec<_>>()
            .join(",");
        assert!(parse_ids(&raw).is_err());
    }

    #[test]
    fn update_validation_checks_supplied_fields_only() {
        assert!(validate_update(&UpdatePage::default()).is_ok());
        let bad_level = UpdatePage {
            level: Some(9),
            ..Default::default()
        };
        assert!(validate_update(&bad_level).is_err());
        let bad_config = UpdatePage {
            meta: Some(UpdatePageMeta {
                config: Some(serde_json::json!("flat")),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(validate_update(&bad_config).is_err());
    }
}

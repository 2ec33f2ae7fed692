//! Route definitions for document pages, their metadata, links and
//! revision history.
//!
//! Registered under `/documents/{doc}`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{links, pages, revisions};
use crate::state::AppState;

/// Document routes, registered as `/documents/{doc}`.
///
/// ```text
/// GET    /pages?ids=&content=                   list_pages
/// POST   /pages                                 create_page
/// GET    /pages/next-sequence                   get_next_sequence
/// GET    /pages/{page}                          get_page
/// PUT    /pages/{page}?skip_revision=           update_page
/// DELETE /pages/{page}                          delete_page
/// PUT    /pages/{page}/sequence                 update_page_sequence
/// PUT    /pages/{page}/level                    update_page_level
/// GET    /pages/{page}/meta                     get_page_meta
/// PUT    /pages/{page}/meta                     update_page_meta
/// GET    /pages/{page}/links                    list_page_links
/// GET    /pages/{page}/revisions                list_page_revisions
/// GET    /pages/{page}/revisions/{rev}          get_page_revision
/// POST   /pages/{page}/revisions/{rev}/restore  restore_page_revision
/// GET    /revisions                             list_document_revisions
/// GET    /meta?external_only=                   list_document_meta
/// GET    /links                                 list_document_links
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pages", get(pages::list_pages).post(pages::create_page))
        .route("/pages/next-sequence", get(pages::get_next_sequence))
        .route(
            "/pages/{page}",
            get(pages::get_page)
                .put(pages::update_page)
                .delete(pages::delete_page),
        )
        .route("/pages/{page}/sequence", put(pages::update_page_sequence))
        .route("/pages/{page}/level", put(pages::update_page_level))
        .route(
            "/pages/{page}/meta",
            get(pages::get_page_meta).put(pages::update_page_meta),
        )
        .route("/pages/{page}/links", get(links::list_page_links))
        .route("/pages/{page}/revisions", get(revisions::list_page_revisions))
        .route(
            "/pages/{page}/revisions/{rev}",
            get(revisions::get_page_revision),
        )
        .route(
            "/pages/{page}/revisions/{rev}/restore",
            post(revisions::restore_page_revision),
        )
        .route("/revisions", get(revisions::list_document_revisions))
        .route("/meta", get(pages::list_document_meta))
        .route("/links", get(links::list_document_links))
}

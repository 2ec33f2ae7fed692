pub mod accounts;
pub mod documents;
pub mod health;
pub mod search;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /accounts/sync                                    create or attach caller's account
///
/// /search                                           full-text page search
///
/// /documents/{doc}/pages                            list, add
/// /documents/{doc}/pages/next-sequence              sequence of the next page
/// /documents/{doc}/pages/{page}                     get, update, delete
/// /documents/{doc}/pages/{page}/sequence            reorder (PUT)
/// /documents/{doc}/pages/{page}/level               change level (PUT)
/// /documents/{doc}/pages/{page}/meta                get, update metadata
/// /documents/{doc}/pages/{page}/links               outgoing links
/// /documents/{doc}/pages/{page}/revisions           page history
/// /documents/{doc}/pages/{page}/revisions/{rev}     one revision
/// /documents/{doc}/pages/{page}/revisions/{rev}/restore  restore (POST)
/// /documents/{doc}/revisions                        document history
/// /documents/{doc}/meta                             metadata of all pages
/// /documents/{doc}/links                            outgoing links of all pages
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/accounts", accounts::router())
        .nest("/search", search::router())
        .nest("/documents/{doc}", documents::router())
}

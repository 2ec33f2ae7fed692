//! Route definitions for account synchronisation.

use axum::routing::post;
use axum::Router;

use crate::handlers::accounts;
use crate::state::AppState;

/// Account routes, registered as `/accounts`.
///
/// ```text
/// POST   /sync                      sync_account
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/sync", post(accounts::sync_account))
}

//! Handler for account synchronisation.
//!
//! Identity lives with the token issuer; this keeps the org-scoped account
//! row (used for author display fields) in step with it.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use folio_db::models::user::UpsertAccount;
use folio_db::repositories::UserRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /accounts/sync
///
/// Create the caller's account, or attach to the existing account with the
/// same email in the organization.
pub async fn sync_account(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpsertAccount>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let user = UserRepo::upsert(&state.pool, auth.org_id, auth.user_id, &input).await?;

    tracing::info!(
        org_id = %auth.org_id,
        user_id = %user.ref_id,
        "Account synced"
    );

    Ok(Json(DataResponse { data: user }))
}

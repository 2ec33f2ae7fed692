//! User account model and DTOs.

use folio_core::types::{DbId, RefId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub ref_id: RefId,
    pub org_id: RefId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub initials: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Profile used to create or attach the caller's account.
#[derive(Debug, Deserialize, Validate)]
pub struct UpsertAccount {
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 100))]
    #[serde(default)]
    pub first_name: String,
    #[validate(length(max = 100))]
    #[serde(default)]
    pub last_name: String,
}

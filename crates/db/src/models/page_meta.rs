//! Page metadata sidecar model and DTOs.

use folio_core::types::{DbId, RefId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `page_meta` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PageMeta {
    pub id: DbId,
    pub page_id: RefId,
    pub org_id: RefId,
    pub user_id: RefId,
    pub document_id: RefId,
    pub raw_body: String,
    pub config: serde_json::Value,
    pub external_source: bool,
    pub created_at: Timestamp,
    pub revised_at: Timestamp,
}

/// Metadata supplied alongside a new page.
#[derive(Debug, Default, Deserialize)]
pub struct CreatePageMeta {
    pub raw_body: Option<String>,
    pub config: Option<serde_json::Value>,
    pub external_source: Option<bool>,
}

/// DTO for updating page metadata. Absent fields keep their value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePageMeta {
    pub raw_body: Option<String>,
    pub config: Option<serde_json::Value>,
    pub external_source: Option<bool>,
}

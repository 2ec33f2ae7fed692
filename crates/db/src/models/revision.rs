//! Revision model.
//!
//! Revisions are immutable snapshots of a page and its metadata, taken just
//! before each recorded update.

use folio_core::types::{DbId, RefId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `revisions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Revision {
    pub id: DbId,
    pub ref_id: RefId,
    pub org_id: RefId,
    pub document_id: RefId,
    pub owner_id: RefId,
    pub page_id: RefId,
    pub user_id: RefId,
    pub content_type: String,
    pub page_type: String,
    pub title: String,
    pub body: String,
    pub raw_body: String,
    pub config: serde_json::Value,
    pub created_at: Timestamp,
    pub revised_at: Timestamp,
}

/// Revision listing row: no content, plus the editor's display fields and
/// the page's current revision counter.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RevisionSummary {
    pub id: DbId,
    pub ref_id: RefId,
    pub org_id: RefId,
    pub document_id: RefId,
    pub owner_id: RefId,
    pub page_id: RefId,
    pub user_id: RefId,
    pub content_type: String,
    pub page_type: String,
    pub title: String,
    pub created_at: Timestamp,
    pub revised_at: Timestamp,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub initials: String,
    pub revisions: i32,
}

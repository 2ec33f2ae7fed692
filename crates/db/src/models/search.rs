//! Search index rows and results.

use folio_core::types::{RefId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A ranked hit from the `search_entries` index.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SearchResult {
    pub document_id: RefId,
    pub page_id: RefId,
    pub page_type: String,
    pub level: i32,
    pub sequence: f64,
    pub title: String,
    pub rank: f32,
    pub headline: String,
    pub updated_at: Timestamp,
}

//! Page model and DTOs.

use folio_core::types::{DbId, RefId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::page_meta::{CreatePageMeta, UpdatePageMeta};

/// A row from the `pages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Page {
    pub id: DbId,
    pub ref_id: RefId,
    pub org_id: RefId,
    pub document_id: RefId,
    pub user_id: RefId,
    pub content_type: String,
    pub page_type: String,
    pub level: i32,
    pub title: String,
    pub body: String,
    pub revisions: i32,
    pub sequence: f64,
    pub block_id: Option<RefId>,
    pub created_at: Timestamp,
    pub revised_at: Timestamp,
}

/// A `pages` row without its body, for list views.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PageSummary {
    pub id: DbId,
    pub ref_id: RefId,
    pub org_id: RefId,
    pub document_id: RefId,
    pub user_id: RefId,
    pub content_type: String,
    pub page_type: String,
    pub level: i32,
    pub title: String,
    pub revisions: i32,
    pub sequence: f64,
    pub block_id: Option<RefId>,
    pub created_at: Timestamp,
    pub revised_at: Timestamp,
}

/// DTO for adding a page to a document.
#[derive(Debug, Default, Deserialize)]
pub struct CreatePage {
    /// Generated when `None`.
    pub ref_id: Option<RefId>,
    pub content_type: Option<String>,
    pub page_type: Option<String>,
    pub level: Option<i32>,
    pub title: String,
    pub body: Option<String>,
    /// Appended after the current last page when `None`.
    pub sequence: Option<f64>,
    pub block_id: Option<RefId>,
    pub meta: Option<CreatePageMeta>,
}

/// DTO for updating a page's content. Absent fields keep their value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePage {
    pub title: Option<String>,
    pub body: Option<String>,
    pub level: Option<i32>,
    pub sequence: Option<f64>,
    pub meta: Option<UpdatePageMeta>,
}

impl UpdatePage {
    /// Overlay the supplied fields onto a loaded page.
    pub fn apply_to(&self, page: &mut Page) {
        if let Some(ref title) = self.title {
            page.title = title.clone();
        }
        if let Some(ref body) = self.body {
            page.body = body.clone();
        }
        if let Some(level) = self.level {
            page.level = level;
        }
        if let Some(sequence) = self.sequence {
            page.sequence = sequence;
        }
    }
}

/// Body of a sequence change.
#[derive(Debug, Deserialize)]
pub struct UpdatePageSequence {
    pub sequence: f64,
}

/// Body of a level change.
#[derive(Debug, Deserialize)]
pub struct UpdatePageLevel {
    pub level: i32,
}

//! Content link model.

use folio_core::links::PriorLink;
use folio_core::types::{DbId, RefId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `content_links` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct ContentLink {
    pub id: DbId,
    pub ref_id: RefId,
    pub org_id: RefId,
    pub space_id: Option<RefId>,
    pub user_id: RefId,
    pub link_type: String,
    pub source_document_id: RefId,
    pub source_page_id: RefId,
    pub target_document_id: Option<RefId>,
    pub target_id: Option<RefId>,
    pub orphan: bool,
    pub created_at: Timestamp,
    pub revised_at: Timestamp,
}

impl From<&ContentLink> for PriorLink {
    fn from(link: &ContentLink) -> Self {
        PriorLink {
            link_type: link.link_type.clone(),
            target_document_id: link.target_document_id,
            target_id: link.target_id,
            orphan: link.orphan,
        }
    }
}

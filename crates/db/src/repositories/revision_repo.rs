//! Repository for the `revisions` table.
//!
//! Revisions are write-once: the only mutations are the snapshot insert and
//! the purge that follows a page deletion.

use folio_core::pages::PAGE_TYPE_SECTION;
use folio_core::types::RefId;
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::models::revision::{Revision, RevisionSummary};

/// Column list for full revision queries.
const COLUMNS: &str = "id, ref_id, org_id, document_id, owner_id, page_id, user_id, \
    content_type, page_type, title, body, raw_body, config, created_at, revised_at";

/// Listing projection, joined with the editor (`u`) and the page (`p`).
const SUMMARY_COLUMNS: &str = "r.id, r.ref_id, r.org_id, r.document_id, r.owner_id, \
    r.page_id, r.user_id, r.content_type, r.page_type, r.title, r.created_at, r.revised_at, \
    COALESCE(u.email, '') AS email, COALESCE(u.first_name, '') AS first_name, \
    COALESCE(u.last_name, '') AS last_name, COALESCE(u.initials, '') AS initials, \
    COALESCE(p.revisions, 0) AS revisions";

const SUMMARY_FROM: &str = "FROM revisions r
     LEFT JOIN users u ON u.ref_id = r.user_id AND u.org_id = r.org_id
     LEFT JOIN pages p ON p.ref_id = r.page_id AND p.org_id = r.org_id";

/// Provides snapshot and history operations for revisions.
pub struct RevisionRepo;

impl RevisionRepo {
    /// Copy the currently persisted state of a page and its metadata into a
    /// new revision attributed to `editor_id`.
    ///
    /// Returns the number of rows written: zero means the page does not
    /// exist in the organization.
    pub async fn snapshot(
        conn: &mut PgConnection,
        org_id: RefId,
        revision_id: RefId,
        editor_id: RefId,
        page_id: RefId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO revisions
                (ref_id, org_id, document_id, owner_id, page_id, user_id, content_type,
                 page_type, title, body, raw_body, config, created_at, revised_at)
             SELECT $1, p.org_id, p.document_id, p.user_id, p.ref_id, $2, p.content_type,
                    p.page_type, p.title, p.body, COALESCE(m.raw_body, ''),
                    COALESCE(m.config, '{}'::jsonb), NOW(), NOW()
             FROM pages p
             LEFT JOIN page_meta m ON m.page_id = p.ref_id AND m.org_id = p.org_id
             WHERE p.org_id = $3 AND p.ref_id = $4",
        )
        .bind(revision_id)
        .bind(editor_id)
        .bind(org_id)
        .bind(page_id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }

    /// Find a revision by its reference id.
    pub async fn find<'e, E: PgExecutor<'e>>(
        executor: E,
        org_id: RefId,
        revision_id: RefId,
    ) -> Result<Option<Revision>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM revisions WHERE org_id = $1 AND ref_id = $2");
        sqlx::query_as::<_, Revision>(&query)
            .bind(org_id)
            .bind(revision_id)
            .fetch_optional(executor)
            .await
    }

    /// Section revisions of a whole document, newest first.
    pub async fn list_by_document(
        pool: &PgPool,
        org_id: RefId,
        document_id: RefId,
    ) -> Result<Vec<RevisionSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} {SUMMARY_FROM}
             WHERE r.org_id = $1 AND r.document_id = $2 AND r.page_type = $3
             ORDER BY r.id DESC"
        );
        sqlx::query_as::<_, RevisionSummary>(&query)
            .bind(org_id)
            .bind(document_id)
            .bind(PAGE_TYPE_SECTION)
            .fetch_all(pool)
            .await
    }

    /// Section revisions of one page, newest first.
    pub async fn list_by_page(
        pool: &PgPool,
        org_id: RefId,
        document_id: RefId,
        page_id: RefId,
    ) -> Result<Vec<RevisionSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} {SUMMARY_FROM}
             WHERE r.org_id = $1 AND r.document_id = $2 AND r.page_id = $3
               AND r.page_type = $4
             ORDER BY r.id DESC"
        );
        sqlx::query_as::<_, RevisionSummary>(&query)
            .bind(org_id)
            .bind(document_id)
            .bind(page_id)
            .bind(PAGE_TYPE_SECTION)
            .fetch_all(pool)
            .await
    }

    /// Purge the history of a page.
    pub async fn delete_by_page(
        conn: &mut PgConnection,
        org_id: RefId,
        page_id: RefId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM revisions WHERE org_id = $1 AND page_id = $2")
            .bind(org_id)
            .bind(page_id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }
}

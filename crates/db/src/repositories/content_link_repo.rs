//! Repository for the `content_links` table.
//!
//! A page's outgoing links are never edited in place: every content change
//! replaces the whole set via [`ContentLinkRepo::recompute_for_page`].

use folio_core::links::{content_links, plan_links, PlannedLink, PriorLink};
use folio_core::types::{new_ref_id, RefId};
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::models::content_link::ContentLink;
use crate::models::page::Page;
use crate::scope::Scope;

/// Column list for content_links queries.
const COLUMNS: &str = "id, ref_id, org_id, space_id, user_id, link_type, \
    source_document_id, source_page_id, target_document_id, target_id, orphan, \
    created_at, revised_at";

/// Provides link graph operations.
pub struct ContentLinkRepo;

impl ContentLinkRepo {
    /// Outgoing links of one page, in insertion order.
    pub async fn list_by_source_page<'e, E: PgExecutor<'e>>(
        executor: E,
        org_id: RefId,
        document_id: RefId,
        page_id: RefId,
    ) -> Result<Vec<ContentLink>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM content_links
             WHERE org_id = $1 AND source_document_id = $2 AND source_page_id = $3
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, ContentLink>(&query)
            .bind(org_id)
            .bind(document_id)
            .bind(page_id)
            .fetch_all(executor)
            .await
    }

    /// Outgoing links of every page in a document.
    pub async fn list_by_source_document(
        pool: &PgPool,
        org_id: RefId,
        document_id: RefId,
    ) -> Result<Vec<ContentLink>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM content_links
             WHERE org_id = $1 AND source_document_id = $2
             ORDER BY source_page_id, id ASC"
        );
        sqlx::query_as::<_, ContentLink>(&query)
            .bind(org_id)
            .bind(document_id)
            .fetch_all(pool)
            .await
    }

    /// Store one planned link with `page` as its source.
    pub async fn create(
        conn: &mut PgConnection,
        org_id: RefId,
        user_id: RefId,
        page: &Page,
        planned: &PlannedLink,
    ) -> Result<ContentLink, sqlx::Error> {
        let link = &planned.link;
        let query = format!(
            "INSERT INTO content_links
                (ref_id, org_id, space_id, user_id, link_type, source_document_id,
                 source_page_id, target_document_id, target_id, orphan)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContentLink>(&query)
            .bind(link.ref_id.unwrap_or_else(new_ref_id))
            .bind(org_id)
            .bind(link.space_id)
            .bind(user_id)
            .bind(&link.link_type)
            .bind(page.document_id)
            .bind(page.ref_id)
            .bind(link.target_document_id)
            .bind(link.target_id)
            .bind(planned.orphan)
            .fetch_one(conn)
            .await
    }

    /// Remove every outgoing link of a page.
    pub async fn delete_by_source_page(
        conn: &mut PgConnection,
        org_id: RefId,
        page_id: RefId,
    ) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM content_links WHERE org_id = $1 AND source_page_id = $2")
                .bind(org_id)
                .bind(page_id)
                .execute(conn)
                .await?;
        Ok(result.rows_affected())
    }

    /// Flag every link that targets `page_id` as orphaned. Returns the
    /// number of links flagged.
    pub async fn mark_orphan_page_links(
        conn: &mut PgConnection,
        org_id: RefId,
        page_id: RefId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE content_links SET orphan = true, revised_at = NOW()
             WHERE org_id = $1 AND target_id = $2 AND orphan = false",
        )
        .bind(org_id)
        .bind(page_id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }

    /// Replace the outgoing links of `page` with the links found in its
    /// current body, carrying forward the orphan flag of links that survive.
    pub async fn recompute_for_page(
        scope: &mut Scope,
        page: &Page,
    ) -> Result<Vec<ContentLink>, sqlx::Error> {
        let org_id = scope.org_id();
        let user_id = scope.user_id();

        let previous =
            Self::list_by_source_page(scope.conn(), org_id, page.document_id, page.ref_id).await?;
        let prior: Vec<PriorLink> = previous.iter().map(PriorLink::from).collect();

        Self::delete_by_source_page(scope.conn(), org_id, page.ref_id).await?;

        let planned = plan_links(content_links(&page.body), &prior);
        let mut stored = Vec::with_capacity(planned.len());
        for link in &planned {
            stored.push(Self::create(scope.conn(), org_id, user_id, page, link).await?);
        }

        tracing::debug!(
            org_id = %org_id,
            page_id = %page.ref_id,
            previous = previous.len(),
            stored = stored.len(),
            "Recomputed content links",
        );

        Ok(stored)
    }
}

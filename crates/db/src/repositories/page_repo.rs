//! Repository for the `pages` table.
//!
//! Mutations go through a [`Scope`] and keep the page's metadata, revision
//! history, content links and search index entry in step, all inside the
//! scope's transaction. The caller commits.

use folio_core::pages::{self, DEFAULT_CONTENT_TYPE, PAGE_TYPE_SECTION};
use folio_core::types::{new_ref_id, RefId};
use sqlx::{PgExecutor, PgPool};

use crate::error::StoreError;
use crate::models::page::{CreatePage, Page, PageSummary};
use crate::models::page_meta::UpdatePageMeta;
use crate::repositories::{ContentLinkRepo, PageMetaRepo, RevisionRepo};
use crate::scope::Scope;
use crate::search_index::SearchIndex;

/// Column list for full page queries.
const COLUMNS: &str = "id, ref_id, org_id, document_id, user_id, content_type, page_type, \
    level, title, body, revisions, sequence, block_id, created_at, revised_at";

/// Column list for body-less list queries.
const SUMMARY_COLUMNS: &str = "id, ref_id, org_id, document_id, user_id, content_type, \
    page_type, level, title, revisions, sequence, block_id, created_at, revised_at";

fn not_found(id: RefId) -> StoreError {
    StoreError::NotFound { entity: "Page", id }
}

/// Provides page lifecycle operations.
pub struct PageRepo;

impl PageRepo {
    /// Add a page and its metadata to a document.
    ///
    /// Without an explicit sequence the page is appended after the current
    /// last page. The search index is notified and the initial body's links
    /// are recorded.
    pub async fn add<S: SearchIndex>(
        scope: &mut Scope,
        index: &S,
        document_id: RefId,
        input: &CreatePage,
    ) -> Result<Page, StoreError> {
        let org_id = scope.org_id();
        let user_id = scope.user_id();

        let sequence = match input.sequence {
            Some(sequence) => sequence,
            None => Self::next_sequence(scope.conn(), org_id, document_id).await?,
        };

        let query = format!(
            "INSERT INTO pages
                (ref_id, org_id, document_id, user_id, content_type, page_type, level,
                 title, body, sequence, block_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        let page = sqlx::query_as::<_, Page>(&query)
            .bind(input.ref_id.unwrap_or_else(new_ref_id))
            .bind(org_id)
            .bind(document_id)
            .bind(user_id)
            .bind(input.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE))
            .bind(input.page_type.as_deref().unwrap_or(PAGE_TYPE_SECTION))
            .bind(input.level.unwrap_or(1))
            .bind(&input.title)
            .bind(input.body.as_deref().unwrap_or(""))
            .bind(sequence)
            .bind(input.block_id)
            .fetch_one(scope.conn())
            .await?;

        PageMetaRepo::create(scope.conn(), &page, input.meta.as_ref()).await?;
        index.add(scope, &page).await?;
        ContentLinkRepo::recompute_for_page(scope, &page).await?;

        Ok(page)
    }

    /// Find a page by its reference id.
    pub async fn find<'e, E: PgExecutor<'e>>(
        executor: E,
        org_id: RefId,
        page_id: RefId,
    ) -> Result<Option<Page>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pages WHERE org_id = $1 AND ref_id = $2");
        sqlx::query_as::<_, Page>(&query)
            .bind(org_id)
            .bind(page_id)
            .fetch_optional(executor)
            .await
    }

    /// Find a page, requiring it to belong to `document_id`.
    pub async fn find_in_document<'e, E: PgExecutor<'e>>(
        executor: E,
        org_id: RefId,
        document_id: RefId,
        page_id: RefId,
    ) -> Result<Option<Page>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM pages WHERE org_id = $1 AND document_id = $2 AND ref_id = $3"
        );
        sqlx::query_as::<_, Page>(&query)
            .bind(org_id)
            .bind(document_id)
            .bind(page_id)
            .fetch_optional(executor)
            .await
    }

    /// All pages of a document in display order.
    pub async fn list_by_document(
        pool: &PgPool,
        org_id: RefId,
        document_id: RefId,
    ) -> Result<Vec<Page>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM pages
             WHERE org_id = $1 AND document_id = $2
             ORDER BY sequence ASC"
        );
        sqlx::query_as::<_, Page>(&query)
            .bind(org_id)
            .bind(document_id)
            .fetch_all(pool)
            .await
    }

    /// The named pages of a document in display order. Unknown ids are
    /// skipped.
    pub async fn list_where_in(
        pool: &PgPool,
        org_id: RefId,
        document_id: RefId,
        page_ids: &[RefId],
    ) -> Result<Vec<Page>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM pages
             WHERE org_id = $1 AND document_id = $2 AND ref_id = ANY($3)
             ORDER BY sequence ASC"
        );
        sqlx::query_as::<_, Page>(&query)
            .bind(org_id)
            .bind(document_id)
            .bind(page_ids)
            .fetch_all(pool)
            .await
    }

    /// All pages of a document without their bodies, in display order.
    pub async fn list_summaries(
        pool: &PgPool,
        org_id: RefId,
        document_id: RefId,
    ) -> Result<Vec<PageSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM pages
             WHERE org_id = $1 AND document_id = $2
             ORDER BY sequence ASC"
        );
        sqlx::query_as::<_, PageSummary>(&query)
            .bind(org_id)
            .bind(document_id)
            .fetch_all(pool)
            .await
    }

    /// The sequence the next appended page of a document receives.
    ///
    /// A failed lookup is treated as an empty document. Fails only when the
    /// document has used up its sequence range.
    pub async fn next_sequence<'e, E: PgExecutor<'e>>(
        executor: E,
        org_id: RefId,
        document_id: RefId,
    ) -> Result<f64, StoreError> {
        let current_max = sqlx::query_scalar::<_, Option<f64>>(
            "SELECT MAX(sequence) FROM pages WHERE org_id = $1 AND document_id = $2",
        )
        .bind(org_id)
        .bind(document_id)
        .fetch_one(executor)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(
                org_id = %org_id,
                document_id = %document_id,
                error = %e,
                "Failed to read max page sequence, using default",
            );
            None
        });

        Ok(pages::next_sequence(current_max)?)
    }

    /// Persist an edited page.
    ///
    /// Unless `skip_revision`, the page's current persisted state is first
    /// snapshotted as revision `revision_id` attributed to `editor_id`, and
    /// the revision counter is bumped afterwards. The search index is
    /// updated and the page's content links are recomputed from the new
    /// body. Returns the page as stored.
    pub async fn update<S: SearchIndex>(
        scope: &mut Scope,
        index: &S,
        page: &Page,
        revision_id: RefId,
        editor_id: RefId,
        skip_revision: bool,
    ) -> Result<Page, StoreError> {
        let org_id = scope.org_id();

        if !skip_revision {
            let written =
                RevisionRepo::snapshot(scope.conn(), org_id, revision_id, editor_id, page.ref_id)
                    .await?;
            if written == 0 {
                return Err(not_found(page.ref_id));
            }
        }

        let query = format!(
            "UPDATE pages SET
                document_id = $3, level = $4, title = $5, body = $6,
                revisions = $7, sequence = $8, revised_at = NOW()
             WHERE org_id = $1 AND ref_id = $2
             RETURNING {COLUMNS}"
        );
        let mut stored = sqlx::query_as::<_, Page>(&query)
            .bind(org_id)
            .bind(page.ref_id)
            .bind(page.document_id)
            .bind(page.level)
            .bind(&page.title)
            .bind(&page.body)
            .bind(page.revisions)
            .bind(page.sequence)
            .fetch_optional(scope.conn())
            .await?
            .ok_or_else(|| not_found(page.ref_id))?;

        index.update(scope, &stored).await?;

        if !skip_revision {
            let query = format!(
                "UPDATE pages SET revisions = revisions + 1
                 WHERE org_id = $1 AND ref_id = $2
                 RETURNING {COLUMNS}"
            );
            stored = sqlx::query_as::<_, Page>(&query)
                .bind(org_id)
                .bind(page.ref_id)
                .fetch_one(scope.conn())
                .await?;
        }

        ContentLinkRepo::recompute_for_page(scope, &stored).await?;

        Ok(stored)
    }

    /// Copy a revision's content back onto its page.
    ///
    /// Goes through [`PageRepo::update`], so the state being replaced is
    /// itself recorded as revision `new_revision_id`. The revision's raw body
    /// and config are written back to the page metadata.
    pub async fn restore_revision<S: SearchIndex>(
        scope: &mut Scope,
        index: &S,
        document_id: RefId,
        page_id: RefId,
        revision_id: RefId,
        new_revision_id: RefId,
    ) -> Result<Page, StoreError> {
        let org_id = scope.org_id();
        let editor_id = scope.user_id();

        let revision = RevisionRepo::find(scope.conn(), org_id, revision_id)
            .await?
            .filter(|r| r.page_id == page_id && r.document_id == document_id)
            .ok_or(StoreError::NotFound {
                entity: "Revision",
                id: revision_id,
            })?;
        let mut page = Self::find_in_document(scope.conn(), org_id, document_id, page_id)
            .await?
            .ok_or_else(|| not_found(page_id))?;

        page.title = revision.title;
        page.body = revision.body;
        let page = Self::update(scope, index, &page, new_revision_id, editor_id, false).await?;

        let meta = UpdatePageMeta {
            raw_body: Some(revision.raw_body),
            config: Some(revision.config),
            external_source: None,
        };
        PageMetaRepo::update(scope.conn(), org_id, Some(editor_id), page_id, &meta).await?;

        Ok(page)
    }

    /// Move a page within its document.
    pub async fn update_sequence<S: SearchIndex>(
        scope: &mut Scope,
        index: &S,
        document_id: RefId,
        page_id: RefId,
        sequence: f64,
    ) -> Result<(), StoreError> {
        let org_id = scope.org_id();
        let result = sqlx::query(
            "UPDATE pages SET sequence = $4, revised_at = NOW()
             WHERE org_id = $1 AND document_id = $2 AND ref_id = $3",
        )
        .bind(org_id)
        .bind(document_id)
        .bind(page_id)
        .bind(sequence)
        .execute(scope.conn())
        .await?;
        if result.rows_affected() == 0 {
            return Err(not_found(page_id));
        }

        index.update_sequence(scope, document_id, page_id, sequence).await?;
        Ok(())
    }

    /// Change a page's heading level.
    pub async fn update_level<S: SearchIndex>(
        scope: &mut Scope,
        index: &S,
        document_id: RefId,
        page_id: RefId,
        level: i32,
    ) -> Result<(), StoreError> {
        let org_id = scope.org_id();
        let result = sqlx::query(
            "UPDATE pages SET level = $4, revised_at = NOW()
             WHERE org_id = $1 AND document_id = $2 AND ref_id = $3",
        )
        .bind(org_id)
        .bind(document_id)
        .bind(page_id)
        .bind(level)
        .execute(scope.conn())
        .await?;
        if result.rows_affected() == 0 {
            return Err(not_found(page_id));
        }

        index.update_level(scope, document_id, page_id, level).await?;
        Ok(())
    }

    /// Delete a page with its metadata, index entry, outgoing links and
    /// revision history, and flag links pointing at it as orphaned.
    pub async fn delete<S: SearchIndex>(
        scope: &mut Scope,
        index: &S,
        document_id: RefId,
        page_id: RefId,
    ) -> Result<(), StoreError> {
        let org_id = scope.org_id();

        let result =
            sqlx::query("DELETE FROM pages WHERE org_id = $1 AND document_id = $2 AND ref_id = $3")
                .bind(org_id)
                .bind(document_id)
                .bind(page_id)
                .execute(scope.conn())
                .await?;
        if result.rows_affected() == 0 {
            return Err(not_found(page_id));
        }

        PageMetaRepo::delete(scope.conn(), org_id, page_id).await?;
        index.delete(scope, document_id, page_id).await?;
        ContentLinkRepo::delete_by_source_page(scope.conn(), org_id, page_id).await?;
        let orphaned = ContentLinkRepo::mark_orphan_page_links(scope.conn(), org_id, page_id).await?;
        let purged = RevisionRepo::delete_by_page(scope.conn(), org_id, page_id).await?;

        tracing::debug!(
            org_id = %org_id,
            page_id = %page_id,
            orphaned,
            purged,
            "Deleted page",
        );

        Ok(())
    }
}

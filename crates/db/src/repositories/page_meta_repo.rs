//! Repository for the `page_meta` sidecar table.

use folio_core::types::RefId;
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::models::page::Page;
use crate::models::page_meta::{CreatePageMeta, PageMeta, UpdatePageMeta};

/// Column list for page_meta queries.
const COLUMNS: &str = "id, page_id, org_id, user_id, document_id, raw_body, config, \
    external_source, created_at, revised_at";

/// Provides CRUD operations for page metadata.
pub struct PageMetaRepo;

impl PageMetaRepo {
    /// Insert the metadata row of a freshly added page.
    pub async fn create(
        conn: &mut PgConnection,
        page: &Page,
        input: Option<&CreatePageMeta>,
    ) -> Result<PageMeta, sqlx::Error> {
        let raw_body = input.and_then(|m| m.raw_body.as_deref()).unwrap_or("");
        let config = input
            .and_then(|m| m.config.clone())
            .unwrap_or_else(|| serde_json::json!({}));
        let external_source = input.and_then(|m| m.external_source).unwrap_or(false);

        let query = format!(
            "INSERT INTO page_meta
                (page_id, org_id, user_id, document_id, raw_body, config, external_source,
                 created_at, revised_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PageMeta>(&query)
            .bind(page.ref_id)
            .bind(page.org_id)
            .bind(page.user_id)
            .bind(page.document_id)
            .bind(raw_body)
            .bind(config)
            .bind(external_source)
            .bind(page.created_at)
            .fetch_one(conn)
            .await
    }

    /// Find the metadata of a page.
    pub async fn find<'e, E: PgExecutor<'e>>(
        executor: E,
        org_id: RefId,
        page_id: RefId,
    ) -> Result<Option<PageMeta>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM page_meta WHERE org_id = $1 AND page_id = $2");
        sqlx::query_as::<_, PageMeta>(&query)
            .bind(org_id)
            .bind(page_id)
            .fetch_optional(executor)
            .await
    }

    /// List the metadata of every page in a document, optionally only the
    /// externally sourced ones.
    pub async fn list_by_document(
        pool: &PgPool,
        org_id: RefId,
        document_id: RefId,
        external_only: bool,
    ) -> Result<Vec<PageMeta>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM page_meta
             WHERE org_id = $1 AND document_id = $2 AND ($3 = false OR external_source = true)
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, PageMeta>(&query)
            .bind(org_id)
            .bind(document_id)
            .bind(external_only)
            .fetch_all(pool)
            .await
    }

    /// Update metadata. Only non-`None` fields are applied; `editor_id`
    /// replaces the recorded user when given.
    pub async fn update(
        conn: &mut PgConnection,
        org_id: RefId,
        editor_id: Option<RefId>,
        page_id: RefId,
        input: &UpdatePageMeta,
    ) -> Result<Option<PageMeta>, sqlx::Error> {
        let query = format!(
            "UPDATE page_meta SET
                raw_body = COALESCE($3, raw_body),
                config = COALESCE($4, config),
                external_source = COALESCE($5, external_source),
                user_id = COALESCE($6, user_id),
                revised_at = NOW()
             WHERE org_id = $1 AND page_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PageMeta>(&query)
            .bind(org_id)
            .bind(page_id)
            .bind(&input.raw_body)
            .bind(&input.config)
            .bind(input.external_source)
            .bind(editor_id)
            .fetch_optional(conn)
            .await
    }

    /// Delete the metadata of a page. Returns the number of rows removed.
    pub async fn delete(
        conn: &mut PgConnection,
        org_id: RefId,
        page_id: RefId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM page_meta WHERE org_id = $1 AND page_id = $2")
            .bind(org_id)
            .bind(page_id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }
}

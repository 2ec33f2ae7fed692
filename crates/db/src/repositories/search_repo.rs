//! Repository for the `search_entries` full-text index.
//!
//! Writes take the request transaction's connection so the index never
//! commits separately from the page rows it mirrors.

use folio_core::types::RefId;
use sqlx::{PgConnection, PgPool};

use crate::models::page::Page;
use crate::models::search::SearchResult;

/// Provides index maintenance and query operations.
pub struct SearchRepo;

impl SearchRepo {
    /// Prove the index table is reachable and readable.
    pub async fn check(pool: &PgPool) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1 FROM search_entries LIMIT 1")
            .fetch_optional(pool)
            .await?;
        Ok(())
    }

    /// Insert or refresh the entry for a page.
    pub async fn upsert_entry(
        conn: &mut PgConnection,
        org_id: RefId,
        page: &Page,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO search_entries
                (org_id, document_id, page_id, page_type, level, sequence, title, body)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT (org_id, page_id) DO UPDATE SET
                document_id = EXCLUDED.document_id,
                page_type = EXCLUDED.page_type,
                level = EXCLUDED.level,
                sequence = EXCLUDED.sequence,
                title = EXCLUDED.title,
                body = EXCLUDED.body,
                updated_at = NOW()",
        )
        .bind(org_id)
        .bind(page.document_id)
        .bind(page.ref_id)
        .bind(&page.page_type)
        .bind(page.level)
        .bind(page.sequence)
        .bind(&page.title)
        .bind(&page.body)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Move an indexed page within its document.
    pub async fn update_sequence(
        conn: &mut PgConnection,
        org_id: RefId,
        document_id: RefId,
        page_id: RefId,
        sequence: f64,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE search_entries SET sequence = $4, updated_at = NOW()
             WHERE org_id = $1 AND document_id = $2 AND page_id = $3",
        )
        .bind(org_id)
        .bind(document_id)
        .bind(page_id)
        .bind(sequence)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }

    /// Change the heading level of an indexed page.
    pub async fn update_level(
        conn: &mut PgConnection,
        org_id: RefId,
        document_id: RefId,
        page_id: RefId,
        level: i32,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE search_entries SET level = $4, updated_at = NOW()
             WHERE org_id = $1 AND document_id = $2 AND page_id = $3",
        )
        .bind(org_id)
        .bind(document_id)
        .bind(page_id)
        .bind(level)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }

    /// Remove a page from the index. Deleting a missing entry is not an error.
    pub async fn delete_entry(
        conn: &mut PgConnection,
        org_id: RefId,
        document_id: RefId,
        page_id: RefId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM search_entries
             WHERE org_id = $1 AND document_id = $2 AND page_id = $3",
        )
        .bind(org_id)
        .bind(document_id)
        .bind(page_id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }

    /// Ranked full-text search over an organization's pages.
    pub async fn search(
        pool: &PgPool,
        org_id: RefId,
        query_text: &str,
        limit: i64,
    ) -> Result<Vec<SearchResult>, sqlx::Error> {
        sqlx::query_as::<_, SearchResult>(
            "SELECT document_id, page_id, page_type, level, sequence, title, \
                    ts_rank(search_vector, websearch_to_tsquery('english', $2)) AS rank, \
                    ts_headline('english', title || ' ' || body, \
                        websearch_to_tsquery('english', $2), 'MaxWords=35, MinWords=10') AS headline, \
                    updated_at \
             FROM search_entries \
             WHERE org_id = $1 AND search_vector @@ websearch_to_tsquery('english', $2) \
             ORDER BY rank DESC, sequence ASC \
             LIMIT $3",
        )
        .bind(org_id)
        .bind(query_text)
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}

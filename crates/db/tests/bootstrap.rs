use sqlx::PgPool;

/// Full bootstrap test: connect, migrate, verify schema.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    folio_db::health_check(&pool).await.unwrap();

    let tables = [
        "users",
        "pages",
        "page_meta",
        "revisions",
        "content_links",
        "search_entries",
    ];

    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

/// The search vector is generated from title and body.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_vector_generated(pool: PgPool) {
    let matched: (bool,) = sqlx::query_as(
        "INSERT INTO search_entries
            (org_id, document_id, page_id, page_type, level, sequence, title, body)
         VALUES (gen_random_uuid(), gen_random_uuid(), gen_random_uuid(),
                 'section', 1, 4096, 'Release notes', 'Shipping the new editor')
         RETURNING search_vector @@ to_tsquery('english', 'editor')",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert!(matched.0);
}

//! Integration tests for content link recomputation.
//!
//! - Recomputing with an unchanged body yields the same link set
//! - Orphan flags survive while the link stays in the body
//! - Links dropped from the body are deleted
//! - Document links are stored without a target id

use folio_core::types::{new_ref_id, RefId, RequestContext};
use folio_db::models::content_link::ContentLink;
use folio_db::models::page::{CreatePage, Page};
use folio_db::repositories::{ContentLinkRepo, PageRepo};
use folio_db::{PgSearchIndex, Scope};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn document_link(document_id: RefId) -> String {
    format!(
        r#"<a data-content-link data-link-type="document" data-link-target-document-id="{document_id}" data-link-target-id="{document_id}">doc</a>"#
    )
}

fn section_link(document_id: RefId, page_id: RefId) -> String {
    format!(
        r#"<a data-content-link data-link-type="section" data-link-target-document-id="{document_id}" data-link-target-id="{page_id}">section</a>"#
    )
}

async fn add_page(pool: &PgPool, ctx: RequestContext, document_id: RefId, body: &str) -> Page {
    let input = CreatePage {
        title: "Links".to_string(),
        body: Some(body.to_string()),
        ..Default::default()
    };
    let mut scope = Scope::begin(pool, ctx).await.unwrap();
    let page = PageRepo::add(&mut scope, &PgSearchIndex, document_id, &input)
        .await
        .unwrap();
    scope.commit().await.unwrap();
    page
}

/// Save `body` onto `page` without recording a revision.
async fn save_body(pool: &PgPool, ctx: RequestContext, page: &Page, body: &str) -> Page {
    let mut edited = page.clone();
    edited.body = body.to_string();
    let mut scope = Scope::begin(pool, ctx).await.unwrap();
    let stored = PageRepo::update(&mut scope, &PgSearchIndex, &edited, new_ref_id(), ctx.user_id, true)
        .await
        .unwrap();
    scope.commit().await.unwrap();
    stored
}

async fn stored_links(pool: &PgPool, ctx: RequestContext, page: &Page) -> Vec<ContentLink> {
    ContentLinkRepo::list_by_source_page(pool, ctx.org_id, page.document_id, page.ref_id)
        .await
        .unwrap()
}

/// The identity of a link set, ignoring row ids and timestamps.
fn shape(links: &[ContentLink]) -> Vec<(String, Option<RefId>, Option<RefId>, bool)> {
    links
        .iter()
        .map(|l| (l.link_type.clone(), l.target_document_id, l.target_id, l.orphan))
        .collect()
}

async fn mark_orphan(pool: &PgPool, link_type: &str) {
    sqlx::query("UPDATE content_links SET orphan = true WHERE link_type = $1")
        .bind(link_type)
        .execute(pool)
        .await
        .unwrap();
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_added_page_records_links(pool: PgPool) {
    let ctx = new_ctx();
    let doc = new_ref_id();
    let other_doc = new_ref_id();
    let target = new_ref_id();

    let body = format!("{}{}", document_link(other_doc), section_link(doc, target));
    let page = add_page(&pool, ctx, doc, &body).await;
    let links = stored_links(&pool, ctx, &page).await;

    assert_eq!(
        shape(&links),
        [
            ("document".to_string(), Some(other_doc), None, false),
            ("section".to_string(), Some(doc), Some(target), false),
        ]
    );
    assert!(links.iter().all(|l| l.source_page_id == page.ref_id));
    assert!(links.iter().all(|l| l.user_id == ctx.user_id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_recompute_is_idempotent(pool: PgPool) {
    let ctx = new_ctx();
    let doc = new_ref_id();
    let body = format!(
        "<p>{}</p><p>{}</p>",
        document_link(new_ref_id()),
        section_link(doc, new_ref_id())
    );
    let page = add_page(&pool, ctx, doc, &body).await;
    mark_orphan(&pool, "section").await;

    let page = save_body(&pool, ctx, &page, &body).await;
    let first = shape(&stored_links(&pool, ctx, &page).await);
    save_body(&pool, ctx, &page, &body).await;
    let second = shape(&stored_links(&pool, ctx, &page).await);

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
    assert!(first.iter().any(|(ty, _, _, orphan)| ty == "section" && *orphan));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_orphan_flag_carries_forward_and_dropped_links_are_deleted(pool: PgPool) {
    let ctx = new_ctx();
    let doc = new_ref_id();
    let linked_doc = new_ref_id();
    let page = add_page(&pool, ctx, doc, &document_link(linked_doc)).await;
    mark_orphan(&pool, "document").await;

    // Still linked: the flag survives the rewrite.
    let body = format!("<h2>Edited</h2>{}", document_link(linked_doc));
    let page = save_body(&pool, ctx, &page, &body).await;
    let links = stored_links(&pool, ctx, &page).await;
    assert_eq!(links.len(), 1);
    assert!(links[0].orphan);
    assert_eq!(links[0].target_document_id, Some(linked_doc));

    // Link removed: the old row goes with it.
    let page = save_body(&pool, ctx, &page, "<p>No links left</p>").await;
    assert!(stored_links(&pool, ctx, &page).await.is_empty());

    // Relinking starts fresh.
    let page = save_body(&pool, ctx, &page, &document_link(linked_doc)).await;
    let links = stored_links(&pool, ctx, &page).await;
    assert_eq!(links.len(), 1);
    assert!(!links[0].orphan);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_document_outbound_links_span_pages(pool: PgPool) {
    let ctx = new_ctx();
    let doc = new_ref_id();
    add_page(&pool, ctx, doc, &document_link(new_ref_id())).await;
    add_page(&pool, ctx, doc, &section_link(doc, new_ref_id())).await;
    add_page(&pool, ctx, doc, "<p>plain</p>").await;

    let links = ContentLinkRepo::list_by_source_document(&pool, ctx.org_id, doc)
        .await
        .unwrap();
    assert_eq!(links.len(), 2);
    assert!(links.iter().all(|l| l.source_document_id == doc));
}

fn new_ctx() -> RequestContext {
    RequestContext::new(new_ref_id(), new_ref_id())
}

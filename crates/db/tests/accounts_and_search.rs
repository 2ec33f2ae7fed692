//! Integration tests for account upserts and full-text search.

use folio_core::types::{new_ref_id, RequestContext};
use folio_db::models::page::CreatePage;
use folio_db::models::user::UpsertAccount;
use folio_db::repositories::{PageRepo, SearchRepo, UserRepo};
use folio_db::{PgSearchIndex, Scope};
use sqlx::PgPool;

fn account(email: &str, first: &str, last: &str) -> UpsertAccount {
    UpsertAccount {
        email: email.to_string(),
        first_name: first.to_string(),
        last_name: last.to_string(),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_upsert_creates_then_attaches(pool: PgPool) {
    let org = new_ref_id();
    let first_id = new_ref_id();

    let created = UserRepo::upsert(&pool, org, first_id, &account("Ada@Example.com", "ada", "lovelace"))
        .await
        .unwrap();
    assert_eq!(created.ref_id, first_id);
    assert_eq!(created.email, "ada@example.com");
    assert_eq!(created.initials, "AL");

    // Same email in the same org attaches to the existing row.
    let attached = UserRepo::upsert(&pool, org, new_ref_id(), &account("ada@example.com", "Ada", "Byron"))
        .await
        .unwrap();
    assert_eq!(attached.id, created.id);
    assert_eq!(attached.ref_id, first_id);
    assert_eq!(attached.last_name, "Byron");
    assert_eq!(attached.initials, "AB");

    let found = UserRepo::find_by_ref_id(&pool, org, first_id).await.unwrap().unwrap();
    assert_eq!(found.first_name, "Ada");

    // Another org gets its own account.
    let other = UserRepo::upsert(&pool, new_ref_id(), new_ref_id(), &account("ada@example.com", "Ada", ""))
        .await
        .unwrap();
    assert_ne!(other.id, created.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_same_user_syncs_into_second_org(pool: PgPool) {
    let user_id = new_ref_id();
    let (org_a, org_b) = (new_ref_id(), new_ref_id());

    let in_a = UserRepo::upsert(&pool, org_a, user_id, &account("ada@example.com", "Ada", "Lovelace"))
        .await
        .unwrap();
    let in_b = UserRepo::upsert(&pool, org_b, user_id, &account("ada@example.com", "Ada", "Lovelace"))
        .await
        .unwrap();

    assert_ne!(in_a.id, in_b.id);
    assert_eq!(in_b.ref_id, user_id);
    assert_eq!(in_b.org_id, org_b);
    assert!(UserRepo::find_by_ref_id(&pool, org_a, user_id).await.unwrap().is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_resync_with_changed_email_updates_account(pool: PgPool) {
    let org = new_ref_id();
    let user_id = new_ref_id();

    let created = UserRepo::upsert(&pool, org, user_id, &account("ada@example.com", "Ada", "Lovelace"))
        .await
        .unwrap();
    let renamed = UserRepo::upsert(&pool, org, user_id, &account("countess@example.com", "Ada", "King"))
        .await
        .unwrap();

    assert_eq!(renamed.id, created.id);
    assert_eq!(renamed.ref_id, user_id);
    assert_eq!(renamed.email, "countess@example.com");
    assert_eq!(renamed.initials, "AK");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE org_id = $1")
        .bind(org)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_ranks_title_matches_first(pool: PgPool) {
    let ctx = RequestContext::new(new_ref_id(), new_ref_id());
    let doc = new_ref_id();

    let mut scope = Scope::begin(&pool, ctx).await.unwrap();
    for (title, body) in [
        ("Deployment", "<p>How we ship the backend</p>"),
        ("Onboarding", "<p>Read the deployment checklist first</p>"),
        ("Holidays", "<p>Office closures</p>"),
    ] {
        let input = CreatePage {
            title: title.to_string(),
            body: Some(body.to_string()),
            ..Default::default()
        };
        PageRepo::add(&mut scope, &PgSearchIndex, doc, &input).await.unwrap();
    }
    scope.commit().await.unwrap();

    let hits = SearchRepo::search(&pool, ctx.org_id, "deployment", 20).await.unwrap();
    let titles: Vec<_> = hits.iter().map(|h| h.title.as_str()).collect();
    assert_eq!(titles, ["Deployment", "Onboarding"]);
    assert!(hits[0].rank >= hits[1].rank);

    let limited = SearchRepo::search(&pool, ctx.org_id, "deployment", 1).await.unwrap();
    assert_eq!(limited.len(), 1);

    assert!(SearchRepo::search(&pool, ctx.org_id, "payroll", 20)
        .await
        .unwrap()
        .is_empty());
}

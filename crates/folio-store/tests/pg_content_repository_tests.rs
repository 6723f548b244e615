//! Integration tests for `PgContentRepository`.
//!
//! Run with `--features postgres-tests` and `DATABASE_URL` pointing at a
//! database the test user may create schemas in.
#![cfg(feature = "postgres-tests")]

use std::sync::Arc;

use folio_core::content::{ContentId, Field, Slug};
use folio_core::error::ContentError;
use folio_core::repository::{ContentRepository, Page};
use folio_store::pg_content_repository::PgContentRepository;
use folio_test_support::{content_types, fixed_time};
use sqlx::PgPool;

fn repository(pool: PgPool) -> PgContentRepository {
    PgContentRepository::new(pool, Arc::new(content_types()))
}

async fn insert_page(repo: &PgContentRepository, slug: &str, day: u32) -> ContentId {
    let types = content_types();
    repo.insert(
        types.get("pages").unwrap(),
        &Slug::parse(slug).unwrap(),
        &[
            Field::new("title", format!("Title of {slug}")),
            Field::new("body", "Body"),
        ],
        fixed_time(day),
    )
    .await
    .unwrap()
}

// --- find_by_id ---

#[sqlx::test(migrations = "../../migrations")]
async fn test_find_by_id_returns_none_for_missing_record(pool: PgPool) {
    let repo = repository(pool);

    let found = repo
        .find_by_id(ContentId::new(12345).unwrap(), None)
        .await
        .unwrap();

    assert!(found.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_insert_and_find_by_id_round_trip(pool: PgPool) {
    let repo = repository(pool);
    let id = insert_page(&repo, "about", 3).await;

    let record = repo.find_by_id(id, None).await.unwrap().unwrap();

    assert_eq!(record.id(), id);
    assert_eq!(record.slug().as_str(), "about");
    assert_eq!(record.content_type().singular_slug, "page");
    assert_eq!(record.published_at(), fixed_time(3));
    let names: Vec<&str> = record.fields().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["title", "body"]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_find_by_id_scoped_to_other_type_is_none(pool: PgPool) {
    let repo = repository(pool);
    let id = insert_page(&repo, "about", 3).await;
    let types = content_types();

    let found = repo
        .find_by_id(id, Some(types.get("entries").unwrap()))
        .await
        .unwrap();

    assert!(found.is_none());
}

// --- slugs ---

#[sqlx::test(migrations = "../../migrations")]
async fn test_find_by_slug_dereferences_owner(pool: PgPool) {
    let repo = repository(pool);
    let id = insert_page(&repo, "contact", 4).await;

    let record = repo
        .find_by_slug(&Slug::parse("contact").unwrap(), None)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(record.id(), id);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_find_by_slug_missing_is_none(pool: PgPool) {
    let repo = repository(pool);

    let found = repo
        .find_by_slug(&Slug::parse("no-such-slug").unwrap(), None)
        .await
        .unwrap();

    assert!(found.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_duplicate_slug_within_type_is_rejected(pool: PgPool) {
    let repo = repository(pool);
    insert_page(&repo, "about", 1).await;
    let types = content_types();

    let result = repo
        .insert(
            types.get("pages").unwrap(),
            &Slug::parse("about").unwrap(),
            &[],
            fixed_time(2),
        )
        .await;

    assert!(matches!(result, Err(ContentError::Infrastructure(_))));
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_concurrent_inserts_of_same_slug_keep_one_owner(pool: PgPool) {
    // Arrange
    let repo = repository(pool);
    let types = content_types();
    let pages = types.get("pages").unwrap();
    let slug = Slug::parse("race").unwrap();

    // Act
    let (first, second) = tokio::join!(
        repo.insert(pages, &slug, &[], fixed_time(1)),
        repo.insert(pages, &slug, &[], fixed_time(2)),
    );

    // Assert
    let outcomes = [first, second];
    let inserted: Vec<ContentId> = outcomes
        .iter()
        .filter_map(|r| r.as_ref().ok().copied())
        .collect();
    assert_eq!(inserted.len(), 1);
    assert!(
        outcomes
            .iter()
            .any(|r| matches!(r, Err(ContentError::Infrastructure(_))))
    );
    let owner = repo.find_slug_owner(&slug, Some(pages)).await.unwrap();
    assert_eq!(owner, Some(inserted[0]));
}

// --- latest ---

#[sqlx::test(migrations = "../../migrations")]
async fn test_find_latest_orders_newest_first_and_paginates(pool: PgPool) {
    let repo = repository(pool);
    insert_page(&repo, "oldest", 1).await;
    insert_page(&repo, "middle", 2).await;
    insert_page(&repo, "newest", 3).await;

    let first = repo.find_latest(Page::new(1, 2), None).await.unwrap();
    let second = repo.find_latest(Page::new(2, 2), None).await.unwrap();

    let slugs = |records: &[folio_core::content::ContentRecord]| -> Vec<String> {
        records.iter().map(|r| r.slug().to_string()).collect()
    };
    assert_eq!(slugs(&first), ["newest", "middle"]);
    assert_eq!(slugs(&second), ["oldest"]);
}

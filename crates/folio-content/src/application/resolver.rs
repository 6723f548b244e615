//! Identifier resolution.
//!
//! A request path segment is either a numeric id (`[1-9][0-9]*`) or a slug
//! (`[a-z0-9_-]+`). Ids are loaded directly; slugs go through the slug
//! field to their owning record. A missing record at either step is
//! `NotFound`.

use folio_core::content::{ContentRecord, ContentType, Identifier};
use folio_core::error::ContentError;
use folio_core::repository::ContentRepository;
use tracing::{debug, instrument};

/// Resolves `raw` to a content record of any type.
///
/// # Errors
///
/// Returns `ContentError::InvalidIdentifier` for malformed input,
/// `ContentError::NotFound` when no record matches, and propagates
/// repository failures.
pub async fn resolve(
    raw: &str,
    repo: &dyn ContentRepository,
) -> Result<ContentRecord, ContentError> {
    resolve_scoped(raw, None, repo).await
}

/// Resolves `raw` to a record of `content_type`; records of other types
/// are `NotFound`.
///
/// # Errors
///
/// Same as [`resolve`].
pub async fn resolve_in(
    content_type: &ContentType,
    raw: &str,
    repo: &dyn ContentRepository,
) -> Result<ContentRecord, ContentError> {
    resolve_scoped(raw, Some(content_type), repo).await
}

#[instrument(skip(content_type, repo), fields(content_type = content_type.map(|t| t.slug.as_str())))]
async fn resolve_scoped(
    raw: &str,
    content_type: Option<&ContentType>,
    repo: &dyn ContentRepository,
) -> Result<ContentRecord, ContentError> {
    let identifier: Identifier = raw.parse()?;

    let found = match &identifier {
        Identifier::Id(id) => repo.find_by_id(*id, content_type).await?,
        Identifier::Slug(slug) => repo.find_by_slug(slug, content_type).await?,
    };

    match found {
        Some(record) => {
            debug!(id = %record.id(), "identifier resolved");
            Ok(record)
        }
        None => {
            debug!(%identifier, "identifier did not resolve");
            Err(ContentError::NotFound(identifier.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use folio_core::content::ContentId;
    use folio_core::error::ContentError;
    use folio_test_support::{
        FailingContentRepository, InMemoryContentRepository, entries_type, pages_type, record,
    };

    use super::*;

    fn repo() -> InMemoryContentRepository {
        let pages = Arc::new(pages_type());
        let entries = Arc::new(entries_type());
        InMemoryContentRepository::new(vec![
            record(1, "home", &pages),
            record(42, "about", &pages),
            record(43, "about", &entries),
            record(44, "hello-world", &entries),
        ])
    }

    #[tokio::test]
    async fn test_resolve_numeric_id_returns_record() {
        // Arrange
        let repo = repo();

        // Act
        let record = resolve("42", &repo).await.unwrap();

        // Assert
        assert_eq!(record.id(), ContentId::new(42).unwrap());
        assert_eq!(record.slug().as_str(), "about");
    }

    #[tokio::test]
    async fn test_resolve_every_existing_id() {
        let repo = repo();

        for id in [1_u64, 42, 43, 44] {
            let record = resolve(&id.to_string(), &repo).await.unwrap();
            assert_eq!(record.id().get(), id);
        }
    }

    #[tokio::test]
    async fn test_resolve_slug_returns_owning_record() {
        // Arrange
        let repo = repo();

        // Act
        let record = resolve("hello-world", &repo).await.unwrap();

        // Assert
        assert_eq!(record.id().get(), 44);
        assert_eq!(record.content_type().singular_slug, "entry");
    }

    #[tokio::test]
    async fn test_resolve_unknown_slug_is_not_found() {
        // Arrange
        let repo = repo();

        // Act
        let result = resolve("no-such-slug", &repo).await;

        // Assert
        match result {
            Err(ContentError::NotFound(raw)) => assert_eq!(raw, "no-such-slug"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_resolve_unknown_id_is_not_found() {
        let repo = repo();

        let result = resolve("999", &repo).await;

        assert!(matches!(result, Err(ContentError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_resolve_slug_with_missing_owner_is_not_found() {
        // Arrange
        let repo = repo().with_dangling_slug("orphan", ContentId::new(500).unwrap());

        // Act
        let result = resolve("orphan", &repo).await;

        // Assert
        assert!(matches!(result, Err(ContentError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_resolve_malformed_identifier_is_invalid() {
        let repo = repo();

        let result = resolve("Hello World", &repo).await;

        assert!(matches!(result, Err(ContentError::InvalidIdentifier(_))));
    }

    #[tokio::test]
    async fn test_resolve_in_scopes_slug_to_type() {
        // Arrange
        let repo = repo();

        // Act
        let page = resolve_in(&pages_type(), "about", &repo).await.unwrap();
        let entry = resolve_in(&entries_type(), "about", &repo).await.unwrap();

        // Assert
        assert_eq!(page.id().get(), 42);
        assert_eq!(entry.id().get(), 43);
    }

    #[tokio::test]
    async fn test_resolve_in_rejects_id_of_other_type() {
        let repo = repo();

        let result = resolve_in(&entries_type(), "1", &repo).await;

        assert!(matches!(result, Err(ContentError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_resolve_propagates_repository_failure() {
        let result = resolve("42", &FailingContentRepository).await;

        assert!(matches!(result, Err(ContentError::Infrastructure(_))));
    }
}

//! Mock `ContentRepository` implementations for tests.

use std::collections::HashMap;

use async_trait::async_trait;
use folio_core::content::{ContentId, ContentRecord, ContentType, Slug};
use folio_core::error::ContentError;
use folio_core::repository::{ContentRepository, Page};

/// A repository backed by a vector of records.
///
/// Slug associations can also be registered without a backing record
/// ("dangling") to exercise the missing-owner path.
#[derive(Debug, Default)]
pub struct InMemoryContentRepository {
    records: Vec<ContentRecord>,
    dangling_slugs: HashMap<String, ContentId>,
}

impl InMemoryContentRepository {
    /// Create a repository holding `records`.
    ///
    /// # Panics
    ///
    /// Panics if two records share an id, or share a slug within a type.
    #[must_use]
    pub fn new(records: Vec<ContentRecord>) -> Self {
        let mut repo = Self::default();
        for record in records {
            repo = repo.with_record(record);
        }
        repo
    }

    /// Adds `record`.
    ///
    /// # Panics
    ///
    /// Panics if the id is taken or the slug is taken within the record's type.
    #[must_use]
    pub fn with_record(mut self, record: ContentRecord) -> Self {
        assert!(
            !self.records.iter().any(|r| r.id() == record.id()),
            "duplicate record id {}",
            record.id()
        );
        assert!(
            !self.records.iter().any(|r| r.slug() == record.slug()
                && r.content_type().name == record.content_type().name),
            "duplicate slug {} in {}",
            record.slug(),
            record.content_type().name
        );
        self.records.push(record);
        self
    }

    /// Registers a slug association pointing at `owner`, which need not exist.
    #[must_use]
    pub fn with_dangling_slug(mut self, slug: &str, owner: ContentId) -> Self {
        self.dangling_slugs.insert(slug.to_owned(), owner);
        self
    }
}

fn of_type(record: &ContentRecord, content_type: Option<&ContentType>) -> bool {
    content_type.is_none_or(|t| record.content_type().name == t.name)
}

#[async_trait]
impl ContentRepository for InMemoryContentRepository {
    async fn find_by_id(
        &self,
        id: ContentId,
        content_type: Option<&ContentType>,
    ) -> Result<Option<ContentRecord>, ContentError> {
        Ok(self
            .records
            .iter()
            .find(|r| r.id() == id && of_type(r, content_type))
            .cloned())
    }

    async fn find_slug_owner(
        &self,
        slug: &Slug,
        content_type: Option<&ContentType>,
    ) -> Result<Option<ContentId>, ContentError> {
        let owner = self
            .records
            .iter()
            .filter(|r| r.slug() == slug && of_type(r, content_type))
            .map(ContentRecord::id)
            .min();
        Ok(owner.or_else(|| self.dangling_slugs.get(slug.as_str()).copied()))
    }

    async fn find_latest(
        &self,
        page: Page,
        content_type: Option<&ContentType>,
    ) -> Result<Vec<ContentRecord>, ContentError> {
        let mut matching: Vec<&ContentRecord> = self
            .records
            .iter()
            .filter(|r| of_type(r, content_type))
            .collect();
        matching.sort_by(|a, b| {
            b.published_at()
                .cmp(&a.published_at())
                .then_with(|| b.id().cmp(&a.id()))
        });
        let skip = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(page.size()).unwrap_or(usize::MAX);
        Ok(matching.into_iter().skip(skip).take(take).cloned().collect())
    }
}

/// A repository that always returns an infrastructure error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingContentRepository;

#[async_trait]
impl ContentRepository for FailingContentRepository {
    async fn find_by_id(
        &self,
        _id: ContentId,
        _content_type: Option<&ContentType>,
    ) -> Result<Option<ContentRecord>, ContentError> {
        Err(ContentError::Infrastructure("connection refused".into()))
    }

    async fn find_slug_owner(
        &self,
        _slug: &Slug,
        _content_type: Option<&ContentType>,
    ) -> Result<Option<ContentId>, ContentError> {
        Err(ContentError::Infrastructure("connection refused".into()))
    }

    async fn find_latest(
        &self,
        _page: Page,
        _content_type: Option<&ContentType>,
    ) -> Result<Vec<ContentRecord>, ContentError> {
        Err(ContentError::Infrastructure("connection refused".into()))
    }
}

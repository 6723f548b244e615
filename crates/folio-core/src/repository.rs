//! Content repository abstraction.

use async_trait::async_trait;

use crate::content::{ContentId, ContentRecord, ContentType, Slug};
use crate::error::ContentError;

/// A 1-indexed page of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    number: u32,
    size: u32,
}

impl Page {
    /// Creates a page; numbers and sizes below 1 are raised to 1.
    #[must_use]
    pub fn new(number: u32, size: u32) -> Self {
        Self {
            number: number.max(1),
            size: size.max(1),
        }
    }

    /// Returns the 1-indexed page number.
    #[must_use]
    pub fn number(self) -> u32 {
        self.number
    }

    /// Returns the number of records per page.
    #[must_use]
    pub fn size(self) -> u32 {
        self.size
    }

    /// Returns how many records precede this page.
    #[must_use]
    pub fn offset(self) -> u64 {
        u64::from(self.number - 1) * u64::from(self.size)
    }
}

/// Read access to stored content records.
///
/// Every lookup accepts an optional content type; when given, records of
/// other types are treated as absent.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Loads the record with `id`.
    async fn find_by_id(
        &self,
        id: ContentId,
        content_type: Option<&ContentType>,
    ) -> Result<Option<ContentRecord>, ContentError>;

    /// Finds the id of the record owning the slug field `slug`.
    async fn find_slug_owner(
        &self,
        slug: &Slug,
        content_type: Option<&ContentType>,
    ) -> Result<Option<ContentId>, ContentError>;

    /// Loads the newest records, `published_at` descending then id descending.
    async fn find_latest(
        &self,
        page: Page,
        content_type: Option<&ContentType>,
    ) -> Result<Vec<ContentRecord>, ContentError>;

    /// Loads the record owning `slug`. A slug whose owning record has
    /// disappeared is reported as absent.
    async fn find_by_slug(
        &self,
        slug: &Slug,
        content_type: Option<&ContentType>,
    ) -> Result<Option<ContentRecord>, ContentError> {
        let Some(owner) = self.find_slug_owner(slug, content_type).await? else {
            return Ok(None);
        };
        self.find_by_id(owner, content_type).await
    }
}

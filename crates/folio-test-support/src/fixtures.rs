//! Content fixtures shared across test suites.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use folio_core::content::{ContentId, ContentRecord, ContentType, ContentTypes, Field, Slug};

/// The `pages` content type (`singular_slug = "page"`), no template overrides.
#[must_use]
pub fn pages_type() -> ContentType {
    ContentType {
        name: "Pages".to_owned(),
        slug: "pages".to_owned(),
        singular_slug: "page".to_owned(),
        fields: vec!["title".to_owned(), "body".to_owned()],
        record_template: None,
        listing_template: None,
    }
}

/// The `entries` content type, with record and listing template overrides.
#[must_use]
pub fn entries_type() -> ContentType {
    ContentType {
        name: "Entries".to_owned(),
        slug: "entries".to_owned(),
        singular_slug: "entry".to_owned(),
        fields: vec!["title".to_owned(), "teaser".to_owned()],
        record_template: Some("entry.twig".to_owned()),
        listing_template: Some("entries".to_owned()),
    }
}

/// A registry holding `pages` and `entries`.
///
/// # Panics
///
/// Never; the fixture slugs are distinct.
#[must_use]
pub fn content_types() -> ContentTypes {
    ContentTypes::new(vec![pages_type(), entries_type()]).unwrap()
}

/// Midnight UTC on day `day` of January 2026.
///
/// # Panics
///
/// Panics if `day` is not a valid January day.
#[must_use]
pub fn fixed_time(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, day, 0, 0, 0).unwrap()
}

/// Builds a record with a `title` field, published on January `id` (capped
/// at the 28th).
///
/// # Panics
///
/// Panics if `id` is zero, `slug` is invalid, or the type lacks `title`.
#[must_use]
pub fn record(id: u64, slug: &str, content_type: &Arc<ContentType>) -> ContentRecord {
    let day = u32::try_from(id.clamp(1, 28)).unwrap();
    ContentRecord::new(
        ContentId::new(id).unwrap(),
        Slug::parse(slug).unwrap(),
        Arc::clone(content_type),
        vec![Field::new("title", format!("Record {id}"))],
        fixed_time(day),
    )
    .unwrap()
}

//! Shared test mocks and fixtures for Folio.

mod fixtures;
mod render;
mod repository;

pub use fixtures::{content_types, entries_type, fixed_time, pages_type, record};
pub use render::{FailingRenderer, RecordingRenderer, StaticTemplateLocator};
pub use repository::{FailingContentRepository, InMemoryContentRepository};

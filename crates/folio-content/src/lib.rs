//! Folio: content resolution and template selection.
//!
//! Turns request identifiers into content records, chooses the template
//! for each page kind (theme overrides first, bundled defaults last) and
//! assembles the render context. Also holds the widget registration
//! records consumed by the dashboard.

pub mod application;
pub mod domain;

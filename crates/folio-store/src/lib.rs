//! PostgreSQL persistence for Folio content.
//!
//! Records live in `content`; every field, including the slug, is a row in
//! `field` with a JSONB value.

pub mod pg_content_repository;
pub mod schema;

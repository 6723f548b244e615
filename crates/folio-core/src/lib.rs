//! Folio Core: shared content model and collaborator seams.
//!
//! This crate defines the content types, records, identifiers, typed
//! configuration and the traits the application layer talks to
//! (repository, renderer, template locator). It contains no HTTP or
//! database code.

pub mod config;
pub mod content;
pub mod error;
pub mod render;
pub mod repository;

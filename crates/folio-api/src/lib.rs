//! Folio: HTTP frontend.
//!
//! Serves the homepage, record listings and single records through the
//! content resolver and template chooser, plus the widget registry and a
//! health check.

pub mod app;
pub mod error;
pub mod routes;
pub mod settings;
pub mod state;
pub mod telemetry;

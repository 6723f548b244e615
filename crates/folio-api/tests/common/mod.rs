//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use folio_content::application::page_handlers::Frontend;
use folio_content::application::template_chooser::TemplateChooser;
use folio_content::domain::widget::WidgetRegistry;
use folio_core::config::Config;
use folio_core::render::JsonRenderer;
use folio_test_support::{InMemoryContentRepository, StaticTemplateLocator, content_types, record};
use http_body_util::BodyExt;
use tower::ServiceExt;

use folio_api::app;
use folio_api::state::AppState;

/// Site configuration used by the integration tests: a `skeleton` theme
/// with a homepage override and three records per listing page.
pub const CONFIG_YAML: &str = "\
general:
  theme: skeleton
  listing_records: 3
  homepage: home.twig
";

/// A repository with two pages and four entries.
pub fn repository() -> InMemoryContentRepository {
    let types = content_types();
    let pages = types.get("pages").unwrap();
    let entries = types.get("entries").unwrap();
    InMemoryContentRepository::new(vec![
        record(1, "about", pages),
        record(2, "contact", pages),
        record(3, "first-post", entries),
        record(4, "second-post", entries),
        record(5, "third-post", entries),
        record(6, "fourth-post", entries),
    ])
}

/// Build the full app router over `locator`, using the same route
/// structure as `main.rs`.
pub fn build_test_app_with(locator: StaticTemplateLocator) -> Router {
    let config = Arc::new(Config::from_yaml_str(CONFIG_YAML).unwrap());
    let chooser = TemplateChooser::new(Arc::clone(&config), Arc::new(locator));
    let frontend = Frontend::new(
        Arc::clone(&config),
        Arc::new(content_types()),
        Arc::new(repository()),
        chooser,
        Arc::new(JsonRenderer),
    );
    let state = AppState::new(
        frontend,
        WidgetRegistry::with_bundled(),
        &config.general().theme,
    );
    app::router(state)
}

/// Build the app with only the bundled default templates available.
pub fn build_test_app() -> Router {
    build_test_app_with(StaticTemplateLocator::bundled_defaults())
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

//! Routes for widget registrations.

use axum::extract::{Query, State};
use axum::{Json, Router, routing::get};
use folio_content::domain::widget::{Target, Widget};
use serde::Deserialize;
use tracing::instrument;

use crate::state::AppState;

/// Query string for GET /widgets.
#[derive(Debug, Deserialize)]
pub struct WidgetQuery {
    /// Only return registrations for this zone.
    pub target: Option<Target>,
}

/// GET /widgets
#[instrument(skip(state))]
async fn list_widgets(
    State(state): State<AppState>,
    Query(query): Query<WidgetQuery>,
) -> Json<Vec<Widget>> {
    let widgets = match query.target {
        Some(target) => state.widgets.for_target(target),
        None => state.widgets.all(),
    };
    Json(widgets.into_iter().cloned().collect())
}

/// Returns the widgets router.
pub fn router() -> Router<AppState> {
    Router::new().route("/widgets", get(list_widgets))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use folio_content::application::page_handlers::Frontend;
    use folio_content::application::template_chooser::TemplateChooser;
    use folio_content::domain::widget::{WidgetRegistry, WidgetType};
    use folio_core::config::Config;
    use folio_core::render::JsonRenderer;
    use folio_test_support::{InMemoryContentRepository, StaticTemplateLocator, content_types};
    use serde_json::Value;
    use tower::ServiceExt;

    fn test_app_state() -> AppState {
        let config = Arc::new(Config::default());
        let chooser = TemplateChooser::new(
            Arc::clone(&config),
            Arc::new(StaticTemplateLocator::bundled_defaults()),
        );
        let frontend = Frontend::new(
            config,
            Arc::new(content_types()),
            Arc::new(InMemoryContentRepository::default()),
            chooser,
            Arc::new(JsonRenderer),
        );
        let mut widgets = WidgetRegistry::with_bundled();
        widgets.register(Widget::new(
            "Analytics",
            WidgetType::Snippet,
            Target::EndOfHead,
            10,
            "@theme/analytics.twig",
        ));
        AppState::new(frontend, widgets, "base")
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let app = router().with_state(test_app_state());
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_list_widgets_orders_by_priority() {
        // Act
        let (status, json) = get_json("/widgets").await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|w| w["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["Analytics", "Weather Widget"]);
    }

    #[tokio::test]
    async fn test_list_widgets_filters_by_target() {
        // Act
        let (status, json) = get_json("/widgets?target=widget_back_dashboard_aside_top").await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        let widgets = json.as_array().unwrap();
        assert_eq!(widgets.len(), 1);
        assert_eq!(widgets[0]["type"], "widget");
        assert_eq!(widgets[0]["priority"], 200);
        assert_eq!(widgets[0]["template"], "@bolt/widgets/weather.twig");
    }

    #[tokio::test]
    async fn test_unknown_target_is_rejected() {
        let (status, _) = get_json("/widgets?target=sidebar").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

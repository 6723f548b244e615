//! Shared application state.

use std::sync::Arc;

use folio_content::application::page_handlers::Frontend;
use folio_content::domain::widget::WidgetRegistry;

/// Application state shared across all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Page assembly over the repository, chooser and renderer.
    pub frontend: Arc<Frontend>,
    /// Registered dashboard widgets.
    pub widgets: Arc<WidgetRegistry>,
    /// Name of the active theme, reported by the health check.
    pub theme: Arc<str>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(frontend: Frontend, widgets: WidgetRegistry, theme: &str) -> Self {
        Self {
            frontend: Arc::new(frontend),
            widgets: Arc::new(widgets),
            theme: Arc::from(theme),
        }
    }
}

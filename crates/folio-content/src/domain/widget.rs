//! Widget registration records.
//!
//! A widget is declarative metadata: what it is called, where it is placed,
//! in which order, and which template draws it. Rendering is left to the
//! dashboard.

use serde::{Deserialize, Serialize};

/// What kind of registration this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetType {
    /// A self-contained block placed in a widget zone.
    Widget,
    /// A fragment injected into page markup.
    Snippet,
}

/// Placement zones a widget can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// Right after `<head>`.
    StartOfHead,
    /// Right before `</head>`.
    EndOfHead,
    /// Right after `<body>`.
    StartOfBody,
    /// Right before `</body>`.
    EndOfBody,
    /// Top of the dashboard sidebar.
    WidgetBackDashboardAsideTop,
    /// Middle of the dashboard sidebar.
    WidgetBackDashboardAsideMiddle,
    /// Bottom of the dashboard sidebar.
    WidgetBackDashboardAsideBottom,
    /// Below the dashboard's main content.
    WidgetBackDashboardBelowContent,
}

/// An immutable widget registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Widget {
    name: String,
    #[serde(rename = "type")]
    widget_type: WidgetType,
    target: Target,
    priority: i32,
    template: String,
}

impl Widget {
    /// Creates a registration. Lower `priority` renders earlier.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        widget_type: WidgetType,
        target: Target,
        priority: i32,
        template: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            widget_type,
            target,
            priority,
            template: template.into(),
        }
    }

    /// The display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The registration type.
    #[must_use]
    pub fn widget_type(&self) -> WidgetType {
        self.widget_type
    }

    /// The placement zone.
    #[must_use]
    pub fn target(&self) -> Target {
        self.target
    }

    /// The ordering key; lower is earlier.
    #[must_use]
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// The template that draws the widget.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }
}

/// The bundled weather widget for the dashboard sidebar.
#[must_use]
pub fn weather_widget() -> Widget {
    Widget::new(
        "Weather Widget",
        WidgetType::Widget,
        Target::WidgetBackDashboardAsideTop,
        200,
        "@bolt/widgets/weather.twig",
    )
}

/// Collected widget registrations.
#[derive(Debug, Clone, Default)]
pub struct WidgetRegistry {
    widgets: Vec<Widget>,
}

impl WidgetRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the bundled widgets.
    #[must_use]
    pub fn with_bundled() -> Self {
        let mut registry = Self::new();
        registry.register(weather_widget());
        registry
    }

    /// Adds a registration.
    pub fn register(&mut self, widget: Widget) {
        tracing::debug!(name = widget.name(), target = ?widget.target(), "widget registered");
        self.widgets.push(widget);
    }

    /// Returns every registration, ordered by priority. Equal priorities
    /// keep registration order.
    #[must_use]
    pub fn all(&self) -> Vec<&Widget> {
        let mut widgets: Vec<&Widget> = self.widgets.iter().collect();
        widgets.sort_by_key(|w| w.priority);
        widgets
    }

    /// Returns the registrations for `target`, ordered by priority.
    #[must_use]
    pub fn for_target(&self, target: Target) -> Vec<&Widget> {
        let mut widgets = self.all();
        widgets.retain(|w| w.target == target);
        widgets
    }
}

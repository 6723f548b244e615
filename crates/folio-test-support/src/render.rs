//! Test renderers and template locators.

use std::collections::BTreeSet;
use std::sync::Mutex;

use folio_core::error::ContentError;
use folio_core::render::{RenderContext, RenderedPage, Renderer, TemplateLocator};

/// A locator that knows a fixed set of template names.
#[derive(Debug, Clone, Default)]
pub struct StaticTemplateLocator {
    templates: BTreeSet<String>,
}

impl StaticTemplateLocator {
    /// Create a locator where exactly `templates` exist.
    #[must_use]
    pub fn new<I, S>(templates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            templates: templates.into_iter().map(Into::into).collect(),
        }
    }

    /// A locator holding the bundled `homepage`, `listing` and `record`
    /// defaults and nothing in the theme.
    #[must_use]
    pub fn bundled_defaults() -> Self {
        Self::new([
            "@bolt/homepage.twig",
            "@bolt/listing.twig",
            "@bolt/record.twig",
        ])
    }

    /// Returns a copy with `template` added.
    #[must_use]
    pub fn with(mut self, template: &str) -> Self {
        self.templates.insert(template.to_owned());
        self
    }
}

impl TemplateLocator for StaticTemplateLocator {
    fn exists(&self, template: &str) -> bool {
        self.templates.contains(template)
    }
}

/// A renderer that records every call and echoes the template name as body.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    calls: Mutex<Vec<(String, RenderContext)>>,
}

impl RecordingRenderer {
    /// Create an empty recording renderer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all `(template, context)` pairs rendered.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn calls(&self) -> Vec<(String, RenderContext)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Renderer for RecordingRenderer {
    fn render(&self, template: &str, context: &RenderContext) -> Result<RenderedPage, ContentError> {
        self.calls
            .lock()
            .unwrap()
            .push((template.to_owned(), context.clone()));
        Ok(RenderedPage {
            content_type: "text/plain",
            body: template.to_owned(),
        })
    }
}

/// A renderer that always fails. Useful for testing error-handling paths.
#[derive(Debug)]
pub struct FailingRenderer;

impl Renderer for FailingRenderer {
    fn render(&self, template: &str, _context: &RenderContext) -> Result<RenderedPage, ContentError> {
        Err(ContentError::Render(format!("syntax error in {template}")))
    }
}

//! Renderer and template-locator seams.
//!
//! Template names are namespaced: `@theme/...` resolves inside the active
//! theme directory, `@bolt/...` inside the bundled default templates.

use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::Config;
use crate::error::ContentError;

/// Namespace prefix for templates supplied by the active theme.
pub const THEME_NAMESPACE: &str = "@theme";

/// Namespace prefix for the bundled default templates.
pub const BUNDLED_NAMESPACE: &str = "@bolt";

/// File extension of template files.
pub const TEMPLATE_EXTENSION: &str = "twig";

/// Values handed to the renderer, keyed by template variable name.
pub type RenderContext = Map<String, Value>;

/// Output of a successful render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// MIME type of `body`.
    pub content_type: &'static str,
    /// Rendered output.
    pub body: String,
}

/// Renders a template with a context.
pub trait Renderer: Send + Sync {
    /// Renders `template` with `context`.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Render` when the template cannot be loaded or
    /// evaluated.
    fn render(&self, template: &str, context: &RenderContext) -> Result<RenderedPage, ContentError>;
}

/// Answers whether a namespaced template exists.
pub trait TemplateLocator: Send + Sync {
    /// Returns true if `template` can be loaded.
    fn exists(&self, template: &str) -> bool;
}

/// Locates templates on disk under the theme and bundled directories.
#[derive(Debug, Clone)]
pub struct FilesystemTemplateLocator {
    theme_dir: PathBuf,
    bundled_dir: PathBuf,
}

impl FilesystemTemplateLocator {
    /// Creates a locator over explicit directories.
    #[must_use]
    pub fn new(theme_dir: impl Into<PathBuf>, bundled_dir: impl Into<PathBuf>) -> Self {
        Self {
            theme_dir: theme_dir.into(),
            bundled_dir: bundled_dir.into(),
        }
    }

    /// Creates a locator for the theme and bundled paths in `config`.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.theme_path(), config.bundled_templates_path())
    }

    /// Maps a namespaced template name to a file path. Names outside both
    /// namespaces, or that climb out of their root, map to `None`.
    #[must_use]
    pub fn resolve(&self, template: &str) -> Option<PathBuf> {
        let (namespace, relative) = template.split_once('/')?;
        let root = match namespace {
            THEME_NAMESPACE => &self.theme_dir,
            BUNDLED_NAMESPACE => &self.bundled_dir,
            _ => return None,
        };
        let relative = Path::new(relative);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return None;
        }
        Some(root.join(relative))
    }
}

impl TemplateLocator for FilesystemTemplateLocator {
    fn exists(&self, template: &str) -> bool {
        self.resolve(template).is_some_and(|path| path.is_file())
    }
}

#[derive(Serialize)]
struct JsonPage<'a> {
    template: &'a str,
    context: &'a RenderContext,
}

/// Renders pages as JSON documents carrying the template name and context.
///
/// Stands in for a template engine; the output is exactly what an engine
/// would receive.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, template: &str, context: &RenderContext) -> Result<RenderedPage, ContentError> {
        let body = serde_json::to_string(&JsonPage { template, context })
            .map_err(|e| ContentError::Render(e.to_string()))?;
        Ok(RenderedPage {
            content_type: "application/json",
            body,
        })
    }
}

//! Page handlers for the frontend.
//!
//! Each handler resolves content, chooses a template and renders it. The
//! `prepare_*` functions stop before rendering and return the template and
//! context, so the assembly can be inspected on its own.

use std::sync::Arc;

use folio_core::config::Config;
use folio_core::content::{ContentRecord, ContentType, ContentTypes};
use folio_core::error::ContentError;
use folio_core::render::{RenderContext, RenderedPage, Renderer};
use folio_core::repository::{ContentRepository, Page};
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use crate::application::resolver;
use crate::application::template_chooser::TemplateChooser;
use crate::domain::selection::TemplateSelection;

/// A template choice with the context it will be rendered with.
#[derive(Debug, Clone)]
pub struct PageView {
    /// The selected template.
    pub selection: TemplateSelection,
    /// Template variables.
    pub context: RenderContext,
}

/// The collaborators needed to serve frontend pages.
#[derive(Clone)]
pub struct Frontend {
    config: Arc<Config>,
    content_types: Arc<ContentTypes>,
    repository: Arc<dyn ContentRepository>,
    chooser: TemplateChooser,
    renderer: Arc<dyn Renderer>,
}

impl std::fmt::Debug for Frontend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frontend")
            .field("content_types", &self.content_types)
            .field("chooser", &self.chooser)
            .finish_non_exhaustive()
    }
}

impl Frontend {
    /// Creates a frontend over the given collaborators.
    #[must_use]
    pub fn new(
        config: Arc<Config>,
        content_types: Arc<ContentTypes>,
        repository: Arc<dyn ContentRepository>,
        chooser: TemplateChooser,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        Self {
            config,
            content_types,
            repository,
            chooser,
            renderer,
        }
    }

    /// Renders the homepage.
    ///
    /// # Errors
    ///
    /// Returns `TemplateNotFound` or `Render` errors.
    #[instrument(skip(self))]
    pub fn homepage(&self) -> Result<RenderedPage, ContentError> {
        let view = self.prepare_homepage()?;
        self.render(&view)
    }

    /// Chooses the homepage template; the homepage context is empty.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::TemplateNotFound` if no candidate exists.
    pub fn prepare_homepage(&self) -> Result<PageView, ContentError> {
        Ok(PageView {
            selection: self.chooser.homepage()?,
            context: RenderContext::new(),
        })
    }

    /// Renders page `page` of the latest records, optionally of one type
    /// named by plural or singular slug.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown type, and repository, template
    /// and render errors.
    #[instrument(skip(self))]
    pub async fn listing(
        &self,
        page: u32,
        type_key: Option<&str>,
    ) -> Result<RenderedPage, ContentError> {
        let view = self.prepare_listing(page, type_key).await?;
        self.render(&view)
    }

    /// Loads the listing records and chooses the listing template.
    ///
    /// # Errors
    ///
    /// Same as [`Frontend::listing`], minus render errors.
    pub async fn prepare_listing(
        &self,
        page: u32,
        type_key: Option<&str>,
    ) -> Result<PageView, ContentError> {
        let content_type = type_key.map(|key| self.content_type(key)).transpose()?;
        let page = Page::new(page, self.config.general().listing_records);

        let records = self
            .repository
            .find_latest(page, content_type.map(|t| &**t))
            .await?;
        let selection = self.chooser.listing(content_type.map(|t| &**t))?;

        let mut context = RenderContext::new();
        context.insert("records".to_owned(), to_value(&records)?);
        context.insert("page".to_owned(), Value::from(page.number()));
        if let Some(content_type) = content_type {
            context.insert(
                "content_type".to_owned(),
                Value::from(content_type.slug.as_str()),
            );
        }

        Ok(PageView { selection, context })
    }

    /// Renders the record identified by `raw` (id or slug), optionally
    /// scoped to one type.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIdentifier`, `NotFound`, repository, template and
    /// render errors.
    #[instrument(skip(self))]
    pub async fn record(
        &self,
        raw: &str,
        type_key: Option<&str>,
    ) -> Result<RenderedPage, ContentError> {
        let view = self.prepare_record(raw, type_key).await?;
        self.render(&view)
    }

    /// Resolves the record and chooses its template.
    ///
    /// # Errors
    ///
    /// Same as [`Frontend::record`], minus render errors.
    pub async fn prepare_record(
        &self,
        raw: &str,
        type_key: Option<&str>,
    ) -> Result<PageView, ContentError> {
        let record = match type_key {
            Some(key) => {
                let content_type = self.content_type(key)?;
                resolver::resolve_in(content_type, raw, &*self.repository).await?
            }
            None => resolver::resolve(raw, &*self.repository).await?,
        };
        let selection = self.chooser.record(&record)?;
        let context = record_context(&record)?;
        Ok(PageView { selection, context })
    }

    fn content_type(&self, key: &str) -> Result<&Arc<ContentType>, ContentError> {
        self.content_types
            .get(key)
            .ok_or_else(|| ContentError::NotFound(format!("content type {key}")))
    }

    fn render(&self, view: &PageView) -> Result<RenderedPage, ContentError> {
        self.renderer
            .render(view.selection.template(), &view.context)
            .inspect_err(|e| {
                tracing::error!(
                    kind = %view.selection.kind(),
                    template = view.selection.template(),
                    error = %e,
                    "render failed"
                );
            })
    }
}

/// Builds the context for a record page: the record under `record` and
/// under its type's singular slug.
///
/// # Errors
///
/// Returns `ContentError::Render` if the record cannot be serialized.
pub fn record_context(record: &ContentRecord) -> Result<RenderContext, ContentError> {
    let value = to_value(record)?;
    let mut context = RenderContext::new();
    context.insert(record.content_type().singular_slug.clone(), value.clone());
    context.insert("record".to_owned(), value);
    Ok(context)
}

fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value, ContentError> {
    serde_json::to_value(value).map_err(|e| ContentError::Render(format!("context: {e}")))
}

//! Template selection.
//!
//! Candidates for a page kind, most specific first:
//!
//! 1. the per-type override (`record_template` / `listing_template`), or for
//!    the homepage the first non-empty of `theme/homepage`, `general/homepage`
//! 2. `theme/<kind>_template`, then `general/<kind>_template`
//! 3. `@theme/<kind>.twig`
//! 4. `@bolt/<kind>.twig`
//!
//! Bare names are placed in the theme namespace and get the template
//! extension when they have none. The first candidate the locator can find
//! wins.

use std::path::Path;
use std::sync::Arc;

use folio_core::config::Config;
use folio_core::content::{ContentRecord, ContentType};
use folio_core::error::ContentError;
use folio_core::render::{BUNDLED_NAMESPACE, TEMPLATE_EXTENSION, THEME_NAMESPACE, TemplateLocator};
use tracing::{debug, warn};

use crate::domain::selection::{ContextKind, TemplateSelection};

/// Chooses templates from configuration and the template locator.
#[derive(Clone)]
pub struct TemplateChooser {
    config: Arc<Config>,
    locator: Arc<dyn TemplateLocator>,
}

impl std::fmt::Debug for TemplateChooser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateChooser")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TemplateChooser {
    /// Creates a chooser.
    #[must_use]
    pub fn new(config: Arc<Config>, locator: Arc<dyn TemplateLocator>) -> Self {
        Self { config, locator }
    }

    /// Chooses the homepage template.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::TemplateNotFound` if no candidate exists.
    pub fn homepage(&self) -> Result<TemplateSelection, ContentError> {
        self.choose(ContextKind::Homepage, None)
    }

    /// Chooses the listing template, optionally for one content type.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::TemplateNotFound` if no candidate exists.
    pub fn listing(
        &self,
        content_type: Option<&ContentType>,
    ) -> Result<TemplateSelection, ContentError> {
        self.choose(ContextKind::Listing, content_type)
    }

    /// Chooses the template for a single record.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::TemplateNotFound` if no candidate exists.
    pub fn record(&self, record: &ContentRecord) -> Result<TemplateSelection, ContentError> {
        self.choose(ContextKind::Record, Some(record.content_type()))
    }

    /// Chooses the template for `kind`.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::TemplateNotFound` if no candidate exists.
    pub fn choose(
        &self,
        kind: ContextKind,
        content_type: Option<&ContentType>,
    ) -> Result<TemplateSelection, ContentError> {
        let candidates = self.candidates(kind, content_type);

        match candidates.iter().position(|c| self.locator.exists(c)) {
            Some(chosen) => {
                let selection = TemplateSelection::new(kind, candidates, chosen);
                debug!(%kind, template = selection.template(), "template selected");
                Ok(selection)
            }
            None => {
                warn!(%kind, ?candidates, "no template candidate exists");
                Err(ContentError::TemplateNotFound {
                    kind: kind.to_string(),
                    candidates,
                })
            }
        }
    }

    /// Lists the candidates for `kind`, most specific first, without
    /// checking which exist.
    #[must_use]
    pub fn candidates(&self, kind: ContextKind, content_type: Option<&ContentType>) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();

        let specific = match kind {
            ContextKind::Homepage => self
                .config
                .option("theme/homepage")
                .or_else(|| self.config.option("general/homepage")),
            ContextKind::Listing => content_type.and_then(|t| t.listing_template.clone()),
            ContextKind::Record => content_type.and_then(|t| t.record_template.clone()),
        };
        names.extend(specific.as_deref().map(qualify));

        let setting = format!("{kind}_template");
        for section in ["theme", "general"] {
            if let Some(name) = self.config.option(&format!("{section}/{setting}")) {
                names.push(qualify(&name));
            }
        }

        names.push(format!("{THEME_NAMESPACE}/{kind}.{TEMPLATE_EXTENSION}"));
        names.push(format!("{BUNDLED_NAMESPACE}/{kind}.{TEMPLATE_EXTENSION}"));

        let mut seen = std::collections::HashSet::new();
        names.retain(|n| seen.insert(n.clone()));
        names
    }
}

fn qualify(name: &str) -> String {
    let name = name.trim();
    let mut qualified = if name.starts_with('@') {
        name.to_owned()
    } else {
        format!("{THEME_NAMESPACE}/{}", name.trim_start_matches('/'))
    };
    if Path::new(&qualified).extension().is_none() {
        qualified.push('.');
        qualified.push_str(TEMPLATE_EXTENSION);
    }
    qualified
}

#[cfg(test)]
mod tests {
    use folio_test_support::{StaticTemplateLocator, entries_type, pages_type, record};

    use super::*;

    fn chooser(config_yaml: &str, locator: StaticTemplateLocator) -> TemplateChooser {
        let config = Config::from_yaml_str(config_yaml).unwrap();
        TemplateChooser::new(Arc::new(config), Arc::new(locator))
    }

    #[test]
    fn test_homepage_uses_theme_option_first() {
        // Arrange
        let locator = StaticTemplateLocator::bundled_defaults().with("@theme/custom.twig");
        let chooser = chooser(
            "general:\n  homepage: generic\ntheme:\n  homepage: custom\n",
            locator,
        );

        // Act
        let selection = chooser.homepage().unwrap();

        // Assert
        assert_eq!(selection.template(), "@theme/custom.twig");
        assert!(!selection.candidates().iter().any(|c| c.contains("generic")));
    }

    #[test]
    fn test_homepage_falls_back_to_general_option() {
        let locator = StaticTemplateLocator::bundled_defaults().with("@theme/start.twig");
        let chooser = chooser("general:\n  homepage: start\ntheme:\n  homepage: ''\n", locator);

        let selection = chooser.homepage().unwrap();

        assert_eq!(selection.template(), "@theme/start.twig");
    }

    #[test]
    fn test_homepage_without_options_uses_bundled_default() {
        // Arrange
        let chooser = chooser(
            "general:\n  homepage: ''\n",
            StaticTemplateLocator::bundled_defaults(),
        );

        // Act
        let selection = chooser.homepage().unwrap();

        // Assert
        assert_eq!(selection.template(), "@bolt/homepage.twig");
        assert!(selection.is_bundled_default());
        assert_eq!(
            selection.candidates(),
            ["@theme/homepage.twig", "@bolt/homepage.twig"]
        );
    }

    #[test]
    fn test_theme_template_overrides_bundled_default() {
        let locator = StaticTemplateLocator::bundled_defaults().with("@theme/listing.twig");
        let chooser = chooser("", locator);

        let selection = chooser.listing(None).unwrap();

        assert_eq!(selection.template(), "@theme/listing.twig");
        assert!(!selection.is_bundled_default());
    }

    #[test]
    fn test_homepage_option_missing_on_disk_falls_through() {
        let chooser = chooser(
            "theme:\n  homepage: custom\n",
            StaticTemplateLocator::bundled_defaults(),
        );

        let selection = chooser.homepage().unwrap();

        assert_eq!(selection.candidates()[0], "@theme/custom.twig");
        assert_eq!(selection.template(), "@bolt/homepage.twig");
    }

    #[test]
    fn test_record_without_override_ignores_type() {
        // Arrange
        let pages = Arc::new(pages_type());
        let chooser = chooser("", StaticTemplateLocator::bundled_defaults());

        // Act
        let selection = chooser.record(&record(42, "about", &pages)).unwrap();

        // Assert
        assert_eq!(selection.kind(), ContextKind::Record);
        assert_eq!(
            selection.candidates(),
            ["@theme/record.twig", "@bolt/record.twig"]
        );
        assert_eq!(selection.template(), "@bolt/record.twig");
    }

    #[test]
    fn test_record_uses_per_type_override() {
        let entries = Arc::new(entries_type());
        let locator = StaticTemplateLocator::bundled_defaults().with("@theme/entry.twig");
        let chooser = chooser("general:\n  record_template: article\n", locator);

        let selection = chooser.record(&record(5, "first", &entries)).unwrap();

        assert_eq!(selection.template(), "@theme/entry.twig");
        assert_eq!(
            selection.candidates(),
            [
                "@theme/entry.twig",
                "@theme/article.twig",
                "@theme/record.twig",
                "@bolt/record.twig"
            ]
        );
    }

    #[test]
    fn test_listing_uses_type_override_then_theme_setting() {
        let chooser = chooser(
            "theme:\n  listing_template: '@bolt/archive.twig'\n",
            StaticTemplateLocator::bundled_defaults().with("@bolt/archive.twig"),
        );

        let selection = chooser.listing(Some(&entries_type())).unwrap();

        assert_eq!(selection.candidates()[0], "@theme/entries.twig");
        assert_eq!(selection.template(), "@bolt/archive.twig");
    }

    #[test]
    fn test_missing_everything_is_template_not_found() {
        // Arrange
        let chooser = chooser("", StaticTemplateLocator::default());

        // Act
        let result = chooser.choose(ContextKind::Record, None);

        // Assert
        match result {
            Err(ContentError::TemplateNotFound { kind, candidates }) => {
                assert_eq!(kind, "record");
                assert_eq!(candidates, ["@theme/record.twig", "@bolt/record.twig"]);
            }
            other => panic!("expected TemplateNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_choose_is_idempotent() {
        let chooser = chooser(
            "theme:\n  homepage: custom\n",
            StaticTemplateLocator::bundled_defaults().with("@theme/custom.twig"),
        );

        let first = chooser.homepage().unwrap();
        let second = chooser.homepage().unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_duplicate_candidates_are_collapsed() {
        let chooser = chooser(
            "general:\n  listing_template: listing.twig\n",
            StaticTemplateLocator::bundled_defaults(),
        );

        let candidates = chooser.candidates(ContextKind::Listing, None);

        assert_eq!(candidates, ["@theme/listing.twig", "@bolt/listing.twig"]);
    }
}

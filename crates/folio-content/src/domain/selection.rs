//! Page kinds and the outcome of template selection.

use std::fmt;

use folio_core::render::BUNDLED_NAMESPACE;

/// The kind of page being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKind {
    /// The site root.
    Homepage,
    /// A paginated list of records.
    Listing,
    /// A single record.
    Record,
}

impl ContextKind {
    /// Returns the kind's name, which is also its base template stem.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Homepage => "homepage",
            Self::Listing => "listing",
            Self::Record => "record",
        }
    }
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The template chosen for a page, with every candidate that was considered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSelection {
    kind: ContextKind,
    candidates: Vec<String>,
    chosen: usize,
}

impl TemplateSelection {
    pub(crate) fn new(kind: ContextKind, candidates: Vec<String>, chosen: usize) -> Self {
        debug_assert!(chosen < candidates.len());
        Self {
            kind,
            candidates,
            chosen,
        }
    }

    /// Returns the page kind the selection was made for.
    #[must_use]
    pub fn kind(&self) -> ContextKind {
        self.kind
    }

    /// Returns the chosen template name.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.candidates[self.chosen]
    }

    /// Returns all candidates, most specific first.
    #[must_use]
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Returns true if the chosen template is a bundled default.
    #[must_use]
    pub fn is_bundled_default(&self) -> bool {
        self.template()
            .strip_prefix(BUNDLED_NAMESPACE)
            .is_some_and(|rest| rest.starts_with('/'))
    }
}

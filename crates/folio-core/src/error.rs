//! Domain error types.

use thiserror::Error;

/// Top-level error type for content resolution and rendering.
#[derive(Debug, Error)]
pub enum ContentError {
    /// No record exists for the requested id or slug.
    #[error("content not found: {0}")]
    NotFound(String),

    /// The identifier is neither a positive id nor a valid slug.
    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// Every template candidate was missing, bundled default included.
    #[error("no template found for {kind}; tried {}", .candidates.join(", "))]
    TemplateNotFound {
        /// The context kind being rendered.
        kind: String,
        /// Candidates that were checked, most specific first.
        candidates: Vec<String>,
    },

    /// The renderer failed to produce output.
    #[error("render error: {0}")]
    Render(String),

    /// A repository or persistence failure.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl ContentError {
    /// Returns true for errors that surface to visitors as "page not found".
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::InvalidIdentifier(_))
    }
}

//! Folio: API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use folio_core::config::ConfigError;
use folio_core::error::ContentError;
use serde::Serialize;
use thiserror::Error;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// A configuration file could not be loaded.
    #[error(transparent)]
    Settings(#[from] ConfigError),

    /// Database connection or pool error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failure.
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// Tracing or exporter setup failure.
    #[error("telemetry error: {0}")]
    Telemetry(String),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer wrapper around `ContentError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub ContentError);

impl From<ContentError> for ApiError {
    fn from(err: ContentError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self.0 {
            ContentError::NotFound(_) | ContentError::InvalidIdentifier(_) => {
                (StatusCode::NOT_FOUND, "page_not_found")
            }
            ContentError::TemplateNotFound { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "template_not_found")
            }
            ContentError::Render(_) => (StatusCode::INTERNAL_SERVER_ERROR, "render_error"),
            ContentError::Infrastructure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "infrastructure_error")
            }
        };

        let message = if self.0.is_not_found() {
            tracing::debug!(error = %self.0, "page not found");
            "page not found".to_owned()
        } else {
            tracing::error!(error = %self.0, "request failed");
            self.0.to_string()
        };

        let body = ErrorBody {
            error: error_code,
            message,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn status_of(err: ContentError) -> StatusCode {
        let response = ApiError(err).into_response();
        response.status()
    }

    #[test]
    fn test_not_found_maps_to_404() {
        assert_eq!(
            status_of(ContentError::NotFound("no-such-slug".into())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_invalid_identifier_maps_to_404() {
        assert_eq!(
            status_of(ContentError::InvalidIdentifier("Bad Slug".into())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_template_not_found_maps_to_500() {
        assert_eq!(
            status_of(ContentError::TemplateNotFound {
                kind: "record".into(),
                candidates: vec!["@bolt/record.twig".into()],
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_render_error_maps_to_500() {
        assert_eq!(
            status_of(ContentError::Render("unexpected token".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_infrastructure_maps_to_500() {
        assert_eq!(
            status_of(ContentError::Infrastructure("db down".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

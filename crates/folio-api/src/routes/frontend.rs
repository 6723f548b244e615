//! Routes for the public site: homepage, listings and single records.

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::{Router, routing::get};
use folio_core::render::RenderedPage;
use serde::Deserialize;
use tracing::instrument;

use crate::error::ApiError;
use crate::state::AppState;

/// A rendered page sent with the renderer's media type.
#[derive(Debug)]
pub struct PageResponse(pub RenderedPage);

impl IntoResponse for PageResponse {
    fn into_response(self) -> Response {
        ([(header::CONTENT_TYPE, self.0.content_type)], self.0.body).into_response()
    }
}

/// Query string for listing pages.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    /// 1-based page number. Kept as text so a malformed value falls back
    /// to the first page instead of rejecting the request.
    pub page: Option<String>,
}

impl ListingQuery {
    /// The requested page; missing, non-numeric and zero values mean page 1.
    /// Values past `u32::MAX` saturate.
    #[must_use]
    pub fn page(&self) -> u32 {
        parse_page(self.page.as_deref())
    }
}

fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(|p| p.trim().parse::<u64>().ok())
        .filter(|p| *p >= 1)
        .map_or(1, |p| u32::try_from(p).unwrap_or(u32::MAX))
}

/// GET /
#[instrument(skip(state))]
async fn homepage(State(state): State<AppState>) -> Result<PageResponse, ApiError> {
    Ok(PageResponse(state.frontend.homepage()?))
}

/// GET /content
#[instrument(skip(state))]
async fn listing(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> Result<PageResponse, ApiError> {
    let page = state.frontend.listing(query.page(), None).await?;
    Ok(PageResponse(page))
}

/// GET /content/{content_type}
#[instrument(skip(state))]
async fn typed_listing(
    State(state): State<AppState>,
    Path(content_type): Path<String>,
    Query(query): Query<ListingQuery>,
) -> Result<PageResponse, ApiError> {
    let page = state
        .frontend
        .listing(query.page(), Some(&content_type))
        .await?;
    Ok(PageResponse(page))
}

/// GET /record/{id_or_slug}
#[instrument(skip(state))]
async fn record(
    State(state): State<AppState>,
    Path(id_or_slug): Path<String>,
) -> Result<PageResponse, ApiError> {
    let page = state.frontend.record(&id_or_slug, None).await?;
    Ok(PageResponse(page))
}

/// GET /content/{content_type}/{id_or_slug}
#[instrument(skip(state))]
async fn typed_record(
    State(state): State<AppState>,
    Path((content_type, id_or_slug)): Path<(String, String)>,
) -> Result<PageResponse, ApiError> {
    let page = state
        .frontend
        .record(&id_or_slug, Some(&content_type))
        .await?;
    Ok(PageResponse(page))
}

/// Returns the router for the public site.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(homepage))
        .route("/content", get(listing))
        .route("/content/{content_type}", get(typed_listing))
        .route("/content/{content_type}/{id_or_slug}", get(typed_record))
        .route("/record/{id_or_slug}", get(record))
}

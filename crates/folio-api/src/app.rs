//! Router assembly.

use axum::Router;

use crate::routes;
use crate::state::AppState;

/// Builds the application router with every route mounted.
///
/// Middleware layers are added by the caller so tests can exercise the
/// bare routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::frontend::router())
        .merge(routes::widgets::router())
        .with_state(state)
}

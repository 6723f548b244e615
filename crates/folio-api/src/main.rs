//! Folio server entry point.

use std::error::Error;
use std::sync::Arc;

use folio_content::application::page_handlers::Frontend;
use folio_content::application::template_chooser::TemplateChooser;
use folio_content::domain::widget::WidgetRegistry;
use folio_core::config::Config;
use folio_core::content::ContentTypes;
use folio_core::render::{FilesystemTemplateLocator, JsonRenderer};
use folio_store::pg_content_repository::PgContentRepository;
use folio_store::schema;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use folio_api::app;
use folio_api::settings::Settings;
use folio_api::state::AppState;
use folio_api::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let telemetry = telemetry::init()?;

    tracing::info!("Starting Folio server");

    let settings = Settings::from_env()?;
    let config = Arc::new(Config::load(&settings.config_path)?);
    let content_types = Arc::new(ContentTypes::load(&settings.content_types_path)?);
    tracing::info!(
        theme = %config.general().theme,
        content_types = content_types.iter().count(),
        "configuration loaded"
    );

    // Create database connection pool.
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&settings.database_url)
        .await?;
    schema::migrate(&pool).await?;

    let repository = Arc::new(PgContentRepository::new(pool, Arc::clone(&content_types)));
    let locator = Arc::new(FilesystemTemplateLocator::from_config(&config));
    let chooser = TemplateChooser::new(Arc::clone(&config), locator);
    let frontend = Frontend::new(
        Arc::clone(&config),
        content_types,
        repository,
        chooser,
        Arc::new(JsonRenderer),
    );
    let app_state = AppState::new(frontend, WidgetRegistry::with_bundled(), &config.general().theme);

    let app = app::router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = settings.addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    telemetry.shutdown();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutdown signal received");
}

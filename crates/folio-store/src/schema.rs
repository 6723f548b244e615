//! Content store database schema.

use sqlx::PgPool;
use sqlx::migrate::{MigrateError, Migrator};

/// Migrations creating the `content` and `field` tables.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Name of the field row that carries a record's slug.
pub const SLUG_FIELD: &str = "slug";

/// Applies pending migrations.
///
/// # Errors
///
/// Returns `MigrateError` if a migration fails or the history is inconsistent.
pub async fn migrate(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}

//! Embedded schema for the `roles` and `sessions` tables.

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use dirguard_core::error::{AppError, ErrorKind};

/// Migrations compiled in from the workspace `migrations/` directory.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Versions and descriptions of every embedded migration, oldest first.
pub fn embedded_migrations() -> Vec<(i64, String)> {
    MIGRATOR
        .iter()
        .map(|m| (m.version, m.description.to_string()))
        .collect()
}

/// Brings the schema up to date. Already-applied versions are skipped.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    let latest = MIGRATOR.iter().map(|m| m.version).max().unwrap_or_default();
    info!(latest_version = latest, "Applying Dirguard schema migrations");

    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Schema migration to version {latest} failed: {e}"),
            e,
        )
    })?;

    info!(latest_version = latest, "Dirguard schema is up to date");
    Ok(())
}

//! Database migration command.

use sqlx::PgPool;

use crate::output;
use dirguard_core::error::AppError;
use dirguard_database::migration::{embedded_migrations, run_migrations};

/// Apply pending migrations and list the schema versions now in place
pub async fn execute(pool: &PgPool) -> Result<(), AppError> {
    run_migrations(pool).await?;
    for (version, description) in embedded_migrations() {
        println!("  {version}  {description}");
    }
    output::print_success("Schema is up to date.");
    Ok(())
}

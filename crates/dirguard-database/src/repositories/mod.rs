//! Repository traits and their PostgreSQL implementations.

pub mod role;
pub mod session;

pub use role::{PgRoleRepository, RoleRepository};
pub use session::{PgSessionRepository, SessionRepository};

use dirguard_core::error::{AppError, ErrorKind};

/// Maps a sqlx error into an [`AppError`], keeping the driver error as the
/// source. Unique-constraint violations become `Conflict`.
pub(crate) fn db_error(message: &str, err: sqlx::Error) -> AppError {
    let kind = match err.as_database_error() {
        Some(db_err) if db_err.is_unique_violation() => ErrorKind::Conflict,
        _ => ErrorKind::Database,
    };
    AppError::with_source(kind, format!("{message}: {err}"), err)
}

//! Convenience result type alias for Dirguard.

use crate::error::AppError;

/// A specialized `Result` type for Dirguard operations.
pub type AppResult<T> = Result<T, AppError>;

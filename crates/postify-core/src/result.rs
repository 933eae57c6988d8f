//! Convenience result type alias for Postify.

use crate::error::AppError;

/// A specialized `Result` type for Postify operations.
pub type AppResult<T> = Result<T, AppError>;

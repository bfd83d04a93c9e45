//! Result type aliases for the user store.

use crate::UserStoreError;

/// A specialized `Result` type for user store operations.
pub type UserStoreResult<T> = Result<T, UserStoreError>;

/// Boxed error used as the wrapped cause of classified errors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

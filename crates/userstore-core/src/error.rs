//! Classified error types for user store operations.

use crate::BoxError;
use std::fmt;
use thiserror::Error;

/// Generic message carried by internal errors.
///
/// Raw driver text never becomes the message of an internal error; it is
/// only reachable through the wrapped source.
pub const DEFAULT_MESSAGE: &str = "unknown error occurred";

/// Stable classification of a [`UserStoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A uniqueness constraint rejected the write.
    Duplicate,
    /// The looked-up record does not exist.
    NotFound,
    /// Anything else.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duplicate => write!(f, "duplicate"),
            Self::NotFound => write!(f, "not_found"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

/// Error returned by user store operations.
///
/// Every variant produced by the store keeps the low-level cause as its
/// [`std::error::Error::source`].
#[derive(Error, Debug)]
pub enum UserStoreError {
    /// Insert violated the email uniqueness constraint.
    #[error("user with email '{email}' already exists")]
    Duplicate {
        email: String,
        #[source]
        source: BoxError,
    },

    /// Lookup by email matched no record.
    #[error("user with email '{email}' not found")]
    NotFound {
        email: String,
        #[source]
        source: BoxError,
    },

    /// Connectivity, decoding, timeout or any unclassified failure.
    #[error("{message}")]
    Internal {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Configuration could not be loaded or failed validation.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl UserStoreError {
    /// Creates a duplicate error for `email`, wrapping `source`.
    #[must_use]
    pub fn duplicate(email: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Duplicate {
            email: email.into(),
            source: source.into(),
        }
    }

    /// Creates a not-found error for `email`, wrapping `source`.
    #[must_use]
    pub fn not_found(email: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::NotFound {
            email: email.into(),
            source: source.into(),
        }
    }

    /// Creates an internal error with the generic message, wrapping `source`.
    #[must_use]
    pub fn internal(source: impl Into<BoxError>) -> Self {
        Self::Internal {
            message: DEFAULT_MESSAGE.to_string(),
            source: Some(source.into()),
        }
    }

    /// Creates an internal error with a custom message and no cause.
    #[must_use]
    pub fn internal_msg(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Returns the classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Duplicate { .. } => ErrorKind::Duplicate,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Internal { .. } | Self::Configuration(_) => ErrorKind::Internal,
        }
    }

    /// Returns `true` for a uniqueness violation.
    #[must_use]
    pub const fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }

    /// Returns `true` when the record was not found.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns the HTTP status code an application layer would map this to.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Duplicate { .. } => 409,
            Self::NotFound { .. } => 404,
            Self::Internal { .. } | Self::Configuration(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Duplicate { .. } => "DUPLICATE",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Internal { .. } => "INTERNAL_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for UserStoreError {
    /// Unclassified driver failures are internal. Email-aware classification
    /// happens in the repository, where the email is known.
    fn from(err: sqlx::Error) -> Self {
        Self::internal(err)
    }
}

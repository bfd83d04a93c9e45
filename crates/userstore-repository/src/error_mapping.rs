//! Translation of SQLx failures into classified store errors.

use sqlx::error::ErrorKind as DbErrorKind;
use tracing::debug;
use userstore_core::UserStoreError;

/// SQLSTATE for `unique_violation`.
const PG_UNIQUE_VIOLATION: &str = "23505";

/// Postgres error text for a unique violation. Last-resort check for errors
/// that reach us without a structured kind or code.
const UNIQUE_VIOLATION_TEXT: &str = "violates unique constraint";

/// Returns `true` if `err` is a uniqueness-constraint violation.
///
/// Checks the driver's classified kind, then the SQLSTATE, then the message.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            matches!(db_err.kind(), DbErrorKind::UniqueViolation)
                || db_err.code().is_some_and(|code| code == PG_UNIQUE_VIOLATION)
                || db_err.message().contains(UNIQUE_VIOLATION_TEXT)
        }
        other => other.to_string().contains(UNIQUE_VIOLATION_TEXT),
    }
}

/// Maps a failed INSERT for `email`.
pub fn map_insert_error(err: sqlx::Error, email: &str) -> UserStoreError {
    if is_unique_violation(&err) {
        if let sqlx::Error::Database(db_err) = &err {
            debug!(constraint = ?db_err.constraint(), "unique constraint rejected insert");
        }
        return UserStoreError::duplicate(email, err);
    }
    UserStoreError::internal(err)
}

/// Maps a failed single-row SELECT keyed by `email`.
pub fn map_lookup_error(err: sqlx::Error, email: &str) -> UserStoreError {
    match err {
        sqlx::Error::RowNotFound => UserStoreError::not_found(email, err),
        other => UserStoreError::internal(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use std::error::Error as StdError;
    use std::fmt;
    use userstore_core::ErrorKind;

    /// Minimal stand-in for a driver error.
    #[derive(Debug)]
    struct FakeDbError {
        message: &'static str,
        code: Option<&'static str>,
        kind: DbErrorKind,
    }

    impl fmt::Display for FakeDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.message)
        }
    }

    impl StdError for FakeDbError {}

    impl sqlx::error::DatabaseError for FakeDbError {
        fn message(&self) -> &str {
            self.message
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            self.code.map(Cow::Borrowed)
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> DbErrorKind {
            match self.kind {
                DbErrorKind::UniqueViolation => DbErrorKind::UniqueViolation,
                DbErrorKind::ForeignKeyViolation => DbErrorKind::ForeignKeyViolation,
                DbErrorKind::NotNullViolation => DbErrorKind::NotNullViolation,
                DbErrorKind::CheckViolation => DbErrorKind::CheckViolation,
                _ => DbErrorKind::Other,
            }
        }
    }

    fn db_error(
        message: &'static str,
        code: Option<&'static str>,
        kind: DbErrorKind,
    ) -> sqlx::Error {
        sqlx::Error::Database(Box::new(FakeDbError { message, code, kind }))
    }

    #[test]
    fn test_unique_violation_by_kind() {
        let err = db_error("conflict", None, DbErrorKind::UniqueViolation);
        assert!(is_unique_violation(&err));
    }

    #[test]
    fn test_unique_violation_by_sqlstate() {
        let err = db_error("conflict", Some("23505"), DbErrorKind::Other);
        assert!(is_unique_violation(&err));
    }

    #[test]
    fn test_unique_violation_by_message_fallback() {
        let err = db_error(
            "duplicate key value violates unique constraint \"users_email_key\"",
            None,
            DbErrorKind::Other,
        );
        assert!(is_unique_violation(&err));
    }

    #[test]
    fn test_other_constraint_is_not_unique_violation() {
        let err = db_error(
            "null value in column \"createdat\" violates not-null constraint",
            Some("23502"),
            DbErrorKind::NotNullViolation,
        );
        assert!(!is_unique_violation(&err));
        assert!(!is_unique_violation(&sqlx::Error::PoolTimedOut));
    }

    #[test]
    fn test_insert_duplicate_carries_email_and_cause() {
        let err = db_error("conflict", Some("23505"), DbErrorKind::UniqueViolation);
        let mapped = map_insert_error(err, "ada@example.com");

        assert_eq!(mapped.kind(), ErrorKind::Duplicate);
        assert!(mapped.to_string().contains("ada@example.com"));
        let source = mapped.source().expect("duplicate keeps the driver error");
        assert!(source.to_string().contains("conflict"));
    }

    #[test]
    fn test_insert_other_failure_is_internal() {
        let mapped = map_insert_error(sqlx::Error::PoolTimedOut, "ada@example.com");
        assert_eq!(mapped.kind(), ErrorKind::Internal);
        assert!(!mapped.to_string().contains("ada@example.com"));
        assert!(mapped.source().is_some());

        let not_null = db_error("not null", Some("23502"), DbErrorKind::NotNullViolation);
        assert_eq!(map_insert_error(not_null, "x").kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_lookup_no_rows_is_not_found() {
        let mapped = map_lookup_error(sqlx::Error::RowNotFound, "missing@example.com");
        assert_eq!(mapped.kind(), ErrorKind::NotFound);
        assert!(mapped.to_string().contains("missing@example.com"));
        assert!(mapped.source().is_some());
    }

    #[test]
    fn test_lookup_other_failure_is_internal() {
        let mapped = map_lookup_error(
            sqlx::Error::ColumnNotFound("first_name".to_string()),
            "ada@example.com",
        );
        assert_eq!(mapped.kind(), ErrorKind::Internal);
    }
}

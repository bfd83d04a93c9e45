//! Store trait definitions.

use async_trait::async_trait;
use userstore_core::{Interface, User, UserStoreResult};

/// Persistence operations for [`User`] records.
///
/// Implementations hold no mutable state of their own and are safe to share
/// across tasks. Each call is attempted exactly once; dropping the returned
/// future cancels the in-flight query.
#[async_trait]
pub trait UserStore: Interface + Send + Sync {
    /// Inserts a new user.
    ///
    /// Fails with a duplicate error if a user with the same email exists.
    async fn create(&self, user: &User) -> UserStoreResult<()>;

    /// Reads the user whose email equals `email` exactly (case-sensitive).
    ///
    /// Fails with a not-found error when no user matches.
    async fn read_by_email(&self, email: &str) -> UserStoreResult<User>;
}

//! User entity.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// A user record.
///
/// The optional profile fields (`first_name`, `last_name`, `mobile`) are
/// plain strings: an absent value is the empty string, never a null
/// marker. `email` is the natural key and is unique across users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub first_name: String,
    pub last_name: String,
    pub mobile: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a user with the given email, empty profile fields and both
    /// timestamps set to now.
    ///
    /// The timestamp is truncated to microseconds, the precision Postgres
    /// stores, so the value reads back unchanged.
    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        Self::with_timestamp(email, Utc::now().trunc_subsecs(6))
    }

    /// Creates a user with the given email whose timestamps are both `at`.
    #[must_use]
    pub fn with_timestamp(email: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            mobile: String::new(),
            email: email.into(),
            created_at: at,
            updated_at: at,
        }
    }

    /// Sets the first name.
    #[must_use]
    pub fn first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = first_name.into();
        self
    }

    /// Sets the last name.
    #[must_use]
    pub fn last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = last_name.into();
        self
    }

    /// Sets the mobile number.
    #[must_use]
    pub fn mobile(mut self, mobile: impl Into<String>) -> Self {
        self.mobile = mobile.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_user_has_empty_profile() {
        let user = User::new("ada@example.com");
        assert_eq!(user.email, "ada@example.com");
        assert!(user.first_name.is_empty());
        assert!(user.last_name.is_empty());
        assert!(user.mobile.is_empty());
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn test_builder_setters() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let user = User::with_timestamp("ada@example.com", at)
            .first_name("Ada")
            .last_name("Lovelace")
            .mobile("+44 20 0000 0000");

        assert_eq!(user.first_name, "Ada");
        assert_eq!(user.last_name, "Lovelace");
        assert_eq!(user.mobile, "+44 20 0000 0000");
        assert_eq!(user.created_at, at);
    }

    #[test]
    fn test_new_user_timestamp_has_microsecond_precision() {
        let user = User::new("ada@example.com");
        assert_eq!(user.created_at.timestamp_subsec_nanos() % 1_000, 0);
    }

    #[test]
    fn test_serde_round_trip_keeps_empty_strings() {
        let user = User::new("a@b.c");
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["first_name"], "");
        let back: User = serde_json::from_value(json).unwrap();
        assert_eq!(back, user);
    }
}

//! Postgres user store implementation.

use crate::error_mapping::{map_insert_error, map_lookup_error};
use crate::{traits::UserStore, DatabasePoolInterface};
use async_trait::async_trait;
use shaku::Component;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, Postgres, QueryBuilder};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};
use userstore_config::{is_valid_table_name, StoreConfig, DEFAULT_TABLE_NAME};
use userstore_core::{User, UserStoreError, UserStoreResult};

/// Columns written by `create`, in bind order.
const INSERT_COLUMNS: &str = "firstName, lastName, mobile, email, createdAt, updatedAt";

/// Columns read by `read_by_email`, aliased to [`UserRow`] field names.
const SELECT_COLUMNS: &str = "firstName AS first_name, lastName AS last_name, mobile, email, \
                              createdAt AS created_at, updatedAt AS updated_at";

/// Postgres user store.
///
/// Holds a shared pool handle and immutable settings only, so clones are
/// cheap and any number of tasks may call it at once.
#[derive(Component, Clone)]
#[shaku(interface = UserStore)]
pub struct PgUserStore {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
    #[shaku(default = DEFAULT_TABLE_NAME.to_string())]
    pub(crate) table_name: String,
    pub(crate) query_timeout: Option<Duration>,
}

impl PgUserStore {
    /// Creates a store over the `Users` table with no operation timeout.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self {
            pool,
            table_name: DEFAULT_TABLE_NAME.to_string(),
            query_timeout: None,
        }
    }

    /// Creates a store using the table name and timeout from `config`.
    ///
    /// Rejects table names that are not plain SQL identifiers, since the
    /// name is spliced into the statement text.
    pub fn with_config(
        pool: Arc<dyn DatabasePoolInterface>,
        config: &StoreConfig,
    ) -> UserStoreResult<Self> {
        Self::check_table_name(&config.table_name)?;

        Ok(Self {
            pool,
            table_name: config.table_name.clone(),
            query_timeout: config.query_timeout(),
        })
    }

    pub(crate) fn check_table_name(table_name: &str) -> UserStoreResult<()> {
        if is_valid_table_name(table_name) {
            Ok(())
        } else {
            Err(UserStoreError::configuration(format!(
                "Invalid table name: '{table_name}'"
            )))
        }
    }

    /// Returns the table this store reads and writes.
    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    fn insert_query<'a>(&self, user: &'a User) -> QueryBuilder<'a, Postgres> {
        let mut builder = QueryBuilder::new("INSERT INTO ");
        builder
            .push(&self.table_name)
            .push(" (")
            .push(INSERT_COLUMNS)
            .push(") ");
        builder.push_values(std::iter::once(user), |mut row, u| {
            row.push_bind(&u.first_name)
                .push_bind(&u.last_name)
                .push_bind(&u.mobile)
                .push_bind(&u.email)
                .push_bind(u.created_at)
                .push_bind(u.updated_at);
        });
        builder
    }

    fn select_by_email_query<'a>(&self, email: &'a str) -> QueryBuilder<'a, Postgres> {
        let mut builder = QueryBuilder::new("SELECT ");
        builder
            .push(SELECT_COLUMNS)
            .push(" FROM ")
            .push(&self.table_name)
            .push(" WHERE email = ")
            .push_bind(email);
        builder
    }

    /// Bounds `op` by the configured timeout, if any.
    async fn bounded<T>(
        &self,
        op: impl Future<Output = UserStoreResult<T>> + Send,
    ) -> UserStoreResult<T> {
        match self.query_timeout {
            Some(limit) => tokio::time::timeout(limit, op)
                .await
                .map_err(UserStoreError::internal)?,
            None => op.await,
        }
    }
}

/// Database row representation of a user.
///
/// The profile columns and `email` are nullable in storage.
#[derive(Debug, FromRow)]
struct UserRow {
    first_name: Option<String>,
    last_name: Option<String>,
    mobile: Option<String>,
    email: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Null policy: a NULL text column becomes the empty string. Absence of a
/// value is never an error.
impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            first_name: row.first_name.unwrap_or_default(),
            last_name: row.last_name.unwrap_or_default(),
            mobile: row.mobile.unwrap_or_default(),
            email: row.email.unwrap_or_default(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn create(&self, user: &User) -> UserStoreResult<()> {
        debug!("Creating user");

        self.bounded(async {
            let mut query = self.insert_query(user);
            query
                .build()
                .execute(self.pool.inner())
                .await
                .map_err(|e| map_insert_error(e, &user.email))?;
            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn read_by_email(&self, email: &str) -> UserStoreResult<User> {
        debug!("Reading user by email");

        self.bounded(async {
            let mut query = self.select_by_email_query(email);
            let row = query
                .build_query_as::<UserRow>()
                .fetch_one(self.pool.inner())
                .await
                .map_err(|e| map_lookup_error(e, email))?;
            Ok(User::from(row))
        })
        .await
    }
}

impl std::fmt::Debug for PgUserStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgUserStore")
            .field("table_name", &self.table_name)
            .field("query_timeout", &self.query_timeout)
            .finish_non_exhaustive()
    }
}

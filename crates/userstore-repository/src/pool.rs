//! Database connection pool management.
//!
//! The pool is owned by the embedding application. Stores only hold an
//! `Arc<dyn DatabasePoolInterface>` and never open or close it.

use async_trait::async_trait;
use shaku::Component;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::ConnectOptions;
use std::sync::Arc;
use tracing::{info, warn};
use userstore_config::DatabaseConfig;
use userstore_core::{Interface, UserStoreError, UserStoreResult};

/// Interface for database pool operations.
#[async_trait]
pub trait DatabasePoolInterface: Interface + Send + Sync {
    /// Returns a reference to the underlying Postgres pool.
    fn inner(&self) -> &PgPool;

    /// Checks if the database connection is healthy.
    async fn health_check(&self) -> UserStoreResult<()>;

    /// Runs database migrations.
    async fn run_migrations(&self) -> UserStoreResult<()>;

    /// Closes the database pool.
    async fn close(&self);
}

/// Database pool wrapper.
///
/// As a component the pool has no default and must be supplied through
/// [`DatabasePoolParameters`] when the module is built.
#[derive(Component, Clone)]
#[shaku(interface = DatabasePoolInterface)]
pub struct DatabasePool {
    pub(crate) pool: PgPool,
}

impl DatabasePool {
    /// Creates a new database pool from configuration.
    pub async fn new(config: &DatabaseConfig) -> UserStoreResult<Self> {
        info!("Connecting to Postgres database...");

        let pool = Self::options(config)
            .connect_with(Self::connect_options(config)?)
            .await
            .map_err(|e| {
                warn!("Failed to connect to database: {}", e);
                UserStoreError::internal(e)
            })?;

        info!("Postgres connection pool established");
        Ok(Self { pool })
    }

    /// Creates a pool that connects on first use.
    ///
    /// Fails only if the URL cannot be parsed.
    pub fn new_lazy(config: &DatabaseConfig) -> UserStoreResult<Self> {
        let pool = Self::options(config).connect_lazy_with(Self::connect_options(config)?);
        Ok(Self { pool })
    }

    /// Wraps a pre-existing pool.
    #[must_use]
    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    fn connect_options(config: &DatabaseConfig) -> UserStoreResult<PgConnectOptions> {
        let options: PgConnectOptions = config.url.parse()?;
        Ok(if config.log_queries {
            options
        } else {
            options.disable_statement_logging()
        })
    }

    fn options(config: &DatabaseConfig) -> PgPoolOptions {
        PgPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout())
            .idle_timeout(Some(config.idle_timeout()))
    }
}

#[async_trait]
impl DatabasePoolInterface for DatabasePool {
    fn inner(&self) -> &PgPool {
        &self.pool
    }

    async fn health_check(&self) -> UserStoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn run_migrations(&self) -> UserStoreResult<()> {
        info!("Running database migrations...");
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(UserStoreError::internal)?;
        info!("Database migrations completed");
        Ok(())
    }

    async fn close(&self) {
        info!("Closing database connection pool...");
        self.pool.close().await;
        info!("Database connection pool closed");
    }
}

impl std::ops::Deref for DatabasePool {
    type Target = PgPool;

    fn deref(&self) -> &Self::Target {
        &self.pool
    }
}

impl std::fmt::Debug for DatabasePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabasePool")
            .field("size", &self.pool.size())
            .field("num_idle", &self.pool.num_idle())
            .finish()
    }
}

/// Creates a shared database pool.
pub async fn create_pool(config: &DatabaseConfig) -> UserStoreResult<Arc<DatabasePool>> {
    let pool = DatabasePool::new(config).await?;
    Ok(Arc::new(pool))
}

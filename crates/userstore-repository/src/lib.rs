//! # Userstore Repository
//!
//! Postgres persistence for [`User`](userstore_core::User) records.
//!
//! ```text
//! Application
//!   ↓  Arc<dyn UserStore>             (resolved from UserStoreModule)
//! PgUserStore                         (QueryBuilder + error classification)
//!   ↓  Arc<dyn DatabasePoolInterface> (externally owned pool)
//! Postgres
//! ```
//!
//! `create` and `read_by_email` surface exactly three error kinds:
//! duplicate, not-found and internal. See [`error_mapping`] for how driver
//! errors are classified.

pub mod error_mapping;
pub mod module;
pub mod pool;
pub mod postgres;
pub mod traits;

pub use module::{build_user_store_module, StoreResolver, UserStoreModule};
pub use pool::*;
pub use postgres::{PgUserStore, PgUserStoreParameters};
pub use traits::*;

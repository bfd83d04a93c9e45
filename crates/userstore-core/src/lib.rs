//! # Userstore Core
//!
//! Core types and error definitions for the user store.
//! The [`User`] entity and the [`UserStoreError`] classification live here
//! so that callers can match on error kinds without depending on the
//! database driver.

pub mod error;
pub mod result;
pub mod telemetry;
pub mod user;

pub use error::*;
pub use result::*;
pub use telemetry::{init_tracing, TelemetryConfig};
pub use user::*;

// Re-export shaku for dependency injection
pub use shaku::Interface;

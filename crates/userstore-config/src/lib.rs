//! # Userstore Config
//!
//! Configuration for the user store: database pool settings, store
//! settings and tracing. Supports layered configuration from files and
//! environment variables, with runtime refresh.

mod app_config;
mod loader;
mod validation;

pub use app_config::*;
pub use loader::*;
pub use validation::*;

//! Configuration validation module.
//!
//! Validates every section up front so a bad table name or pool size fails
//! at load time rather than on the first query.

use crate::AppConfig;
use std::fmt;
use url::Url;

/// Configuration validation error variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    /// Pool size configuration is invalid (min must be <= max).
    InvalidPoolSize { min: u32, max: u32 },
    /// Pool size exceeds maximum allowed.
    PoolSizeTooLarge { value: u32, maximum: u32 },
    /// URL format is invalid.
    InvalidUrl { url_type: String, message: String },
    /// Timeout value must be positive.
    NonPositiveTimeout { name: String, value: u64 },
    /// Table name is not a plain SQL identifier.
    InvalidTableName { value: String },
    /// Log level is invalid.
    InvalidLogLevel { value: String },
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPoolSize { min, max } => {
                write!(
                    f,
                    "Invalid pool size: min ({}) cannot be greater than max ({})",
                    min, max
                )
            }
            Self::PoolSizeTooLarge { value, maximum } => {
                write!(f, "Pool size {} exceeds maximum allowed ({})", value, maximum)
            }
            Self::InvalidUrl { url_type, message } => {
                write!(f, "Invalid {} URL: {}", url_type, message)
            }
            Self::NonPositiveTimeout { name, value } => {
                write!(f, "Timeout '{}' must be positive, got {}", name, value)
            }
            Self::InvalidTableName { value } => {
                write!(
                    f,
                    "Invalid table name: '{}' (letters, digits and underscores only, optionally schema-qualified)",
                    value
                )
            }
            Self::InvalidLogLevel { value } => {
                write!(
                    f,
                    "Invalid log level: '{}' (valid: trace, debug, info, warn, error, off)",
                    value
                )
            }
        }
    }
}

impl std::error::Error for ConfigValidationError {}

/// Returns `true` if `name` can be spliced into SQL as a table name.
///
/// Accepts `ident` or `schema.ident`, where each part starts with a letter
/// or underscore, continues with letters, digits or underscores, and fits
/// in Postgres' 63-byte identifier limit.
#[must_use]
pub fn is_valid_table_name(name: &str) -> bool {
    let mut parts = name.split('.');
    let valid = |part: &str| {
        let mut chars = part.chars();
        part.len() <= 63
            && chars
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    };

    match (parts.next(), parts.next(), parts.next()) {
        (Some(table), None, None) => valid(table),
        (Some(schema), Some(table), None) => valid(schema) && valid(table),
        _ => false,
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Maximum connection pool size.
    const MAX_POOL_SIZE: u32 = 1000;
    /// Valid log levels.
    const VALID_LOG_LEVELS: &'static [&'static str] =
        &["trace", "debug", "info", "warn", "error", "off"];

    /// Validates the entire application configuration.
    ///
    /// Returns Ok(()) if valid, or Err with all validation errors found.
    pub fn validate(config: &AppConfig) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        Self::validate_database(&config.database, &mut errors);
        Self::validate_store(&config.store, &mut errors);
        Self::validate_observability(&config.observability, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_database(config: &crate::DatabaseConfig, errors: &mut Vec<ConfigValidationError>) {
        if config.url.is_empty() {
            errors.push(ConfigValidationError::InvalidUrl {
                url_type: "database".to_string(),
                message: "URL cannot be empty".to_string(),
            });
        } else {
            match Url::parse(&config.url) {
                Ok(url) if matches!(url.scheme(), "postgres" | "postgresql") => {}
                Ok(_) => errors.push(ConfigValidationError::InvalidUrl {
                    url_type: "database".to_string(),
                    message: "URL must start with postgres:// or postgresql://".to_string(),
                }),
                Err(e) => errors.push(ConfigValidationError::InvalidUrl {
                    url_type: "database".to_string(),
                    message: e.to_string(),
                }),
            }
        }

        if config.min_connections > config.max_connections {
            errors.push(ConfigValidationError::InvalidPoolSize {
                min: config.min_connections,
                max: config.max_connections,
            });
        }
        if config.max_connections > Self::MAX_POOL_SIZE {
            errors.push(ConfigValidationError::PoolSizeTooLarge {
                value: config.max_connections,
                maximum: Self::MAX_POOL_SIZE,
            });
        }

        if config.connect_timeout_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "database.connect_timeout_secs".to_string(),
                value: 0,
            });
        }
        if config.idle_timeout_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "database.idle_timeout_secs".to_string(),
                value: 0,
            });
        }
    }

    // query_timeout_secs = 0 means "no timeout", so only the table is checked.
    fn validate_store(config: &crate::StoreConfig, errors: &mut Vec<ConfigValidationError>) {
        if !is_valid_table_name(&config.table_name) {
            errors.push(ConfigValidationError::InvalidTableName {
                value: config.table_name.clone(),
            });
        }
    }

    /// Checks the level of every `target=level` directive, e.g.
    /// `info,userstore=debug`. A bare directive is either a level or a
    /// target, and both are accepted by the filter.
    fn validate_observability(
        config: &userstore_core::TelemetryConfig,
        errors: &mut Vec<ConfigValidationError>,
    ) {
        let invalid = config.log_level.split(',').any(|directive| {
            directive.rsplit_once('=').is_some_and(|(_, level)| {
                !Self::VALID_LOG_LEVELS.contains(&level.trim().to_lowercase().as_str())
            })
        });

        if invalid {
            errors.push(ConfigValidationError::InvalidLogLevel {
                value: config.log_level.clone(),
            });
        }
    }
}

/// Formats validation errors for display.
#[must_use]
pub fn format_validation_errors(errors: &[ConfigValidationError]) -> String {
    let mut output = String::from("Configuration validation failed:\n");
    for (i, error) in errors.iter().enumerate() {
        output.push_str(&format!("  {}. {}\n", i + 1, error));
    }
    output
}

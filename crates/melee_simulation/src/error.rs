//! Error types for configuration loading.
//!
//! Combat itself never returns errors across the animation boundary; failures
//! there degrade to "no hit" or "attack does not start". Only config/catalog
//! loaders surface typed errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {what}: {source}")]
    Parse {
        what: String,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

//! Error types for the coordination layer
//!
//! Nothing here reaches the user: callers log these and degrade.

use std::path::PathBuf;

use thiserror::Error;

/// Session storage error type
#[derive(Debug, Error)]
pub enum StorageError {
    /// Storage is disabled or not present in this environment
    #[error("session storage unavailable")]
    Unavailable,

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is out of range
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: String,
    },
}

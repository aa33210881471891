//! Error handling module
//!
//! Error taxonomy for loading a configuration. Every variant is terminal for
//! the load call; nothing here is retried.

use std::io;
use std::path::PathBuf;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `CFG_PATH` is unset or empty
    #[error("CFG_PATH environment variable is not set")]
    MissingPath,

    /// The resolved config file could not be statted
    #[error("config file not found: {}: {source}", .path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The resolved config file has zero length
    #[error("config file is empty: {}", .path.display())]
    EmptyFile { path: PathBuf },

    /// The file could not be read or is not valid env-file syntax
    #[error("failed to read config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    /// A value could not be mapped onto its field
    #[error("failed to unmarshal config key {key}: {reason}")]
    Unmarshal { key: String, reason: String },
}

impl ConfigError {
    /// Check if the failure is about the config source not being there
    pub fn is_missing_source(&self) -> bool {
        matches!(
            self,
            ConfigError::MissingPath
                | ConfigError::FileNotFound { .. }
                | ConfigError::EmptyFile { .. }
        )
    }
}

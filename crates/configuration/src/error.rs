use thiserror::Error;

/// The primary error type for all configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Represents an error originating from the underlying `config` crate,
    /// such as a missing file or a syntax error in the TOML.
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    /// Represents a semantically invalid configuration, such as an empty
    /// dataset URL with no local path to fall back on.
    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}

//! Error handling for the TaskView core layer.
//!
//! The main error type for this crate is [`CoreError`], which encapsulates
//! more specific errors like [`ConfigError`] and [`LoggingError`]. All of them
//! are defined with `thiserror`.
//!
//! # Examples
//!
//! ```rust,ignore
//! use taskview_core::error::CoreError;
//!
//! fn read_settings(path: &std::path::Path) -> Result<String, CoreError> {
//!     std::fs::read_to_string(path).map_err(|source| CoreError::Filesystem {
//!         message: "Failed to read settings".to_string(),
//!         path: path.to_path_buf(),
//!         source,
//!     })
//! }
//! ```

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Core error type for TaskView.
///
/// This enum represents all errors that can occur in the core layer. Higher layers
/// usually wrap it rather than matching on its variants.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Errors related to configuration loading, parsing, or validation.
    #[error("Configuration Error: {0}")]
    Config(#[from] ConfigError),

    /// Errors that occur while setting up the logging system.
    #[error("Logging Error: {0}")]
    Logging(#[from] LoggingError),

    /// Filesystem failures that are not covered by the configuration variants.
    /// Includes a message, the path involved, and the source I/O error.
    #[error("Filesystem Error: {message} (Path: {path:?})")]
    Filesystem {
        message: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Error type for configuration-related operations.
///
/// Typically wrapped by [`CoreError::Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An error occurred while attempting to read a configuration file.
    #[error("Failed to read configuration file from {path:?}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid TOML or does not match the schema.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration values after successful parsing.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    /// A required base directory (e.g. XDG config/data home) could not be determined.
    #[error("Could not determine base directory for {dir_type}")]
    DirectoryUnavailable { dir_type: String },
}

/// Error type for logging setup.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The global subscriber could not be installed.
    #[error("Failed to initialize logging: {0}")]
    InitializationFailure(String),

    /// The configured level or filter directive is not valid.
    #[error("Failed to set log filter: {0}")]
    FilterError(String),
}

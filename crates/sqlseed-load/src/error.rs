//! Error types for loading and execution.

use std::path::PathBuf;

use sqlseed_core::{RenderError, SchemaInferenceError};

/// Errors that can occur while loading files or executing statements.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A file could not be read or typed.
    #[error(transparent)]
    Inference(#[from] SchemaInferenceError),

    /// A statement could not be rendered.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// The database rejected a statement or the connection failed.
    #[error(transparent)]
    Execution(#[from] sqlx::Error),

    /// Failed to parse a configuration file.
    #[error("Invalid configuration in '{path}': {source}")]
    Config {
        /// Path to the configuration file.
        path: PathBuf,
        /// Parser error.
        source: serde_json::Error,
    },

    /// IO error (listing directories, reading config).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file pattern is not usable.
    #[error("Invalid file pattern '{pattern}': {message}")]
    Pattern {
        /// The pattern as given.
        pattern: String,
        /// What is wrong with it.
        message: String,
    },
}

/// Result type for loading operations.
pub type Result<T> = std::result::Result<T, LoadError>;

//! Error types for the command-line planner.

use std::path::PathBuf;

use oxide_alter_core::DialectError;

/// Errors that can occur while loading definitions or planning.
#[derive(Debug, thiserror::Error)]
pub enum AlterError {
    /// Reading a definition file failed.
    #[error("Failed to read '{path}': {source}")]
    Io {
        /// Path of the file.
        path: PathBuf,
        source: std::io::Error,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Unknown dialect name.
    #[error(transparent)]
    Dialect(#[from] DialectError),

    /// A definition file parsed but does not describe a usable table.
    #[error("Invalid table definition '{path}': {message}")]
    InvalidDefinition {
        /// Path of the file.
        path: PathBuf,
        /// What is wrong with it.
        message: String,
    },
}

/// Result type for planner operations.
pub type Result<T> = std::result::Result<T, AlterError>;

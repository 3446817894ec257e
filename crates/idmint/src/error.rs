//! Error types for the idmint library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for idmint operations.
///
/// Only conditions that abort a whole run are represented here. A single
/// malformed record or line is not an error: it is passed through unchanged
/// and counted in the [`FileReport`](crate::corpus::FileReport).
#[derive(Debug, Error)]
pub enum IdmintError {
    /// Error reading, writing, or creating a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An input file does not exist. Detected before any output is written.
    #[error("Input file not found: {}", .0.display())]
    MissingInput(PathBuf),

    /// Two jobs would write the same file, or a write would clobber an
    /// input or the mapping file. Detected before any output is written.
    #[error("Output conflict for '{}': {reason}", .path.display())]
    OutputConflict { path: PathBuf, reason: String },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A persisted mapping is not a valid one-to-one UUID v4 mapping.
    #[error("Mapping error: {0}")]
    Mapping(String),

    /// The substring substitution automaton could not be built.
    #[error("Substitution automaton error: {0}")]
    Automaton(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regex compilation error.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl IdmintError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IdmintError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for idmint operations.
pub type Result<T> = std::result::Result<T, IdmintError>;

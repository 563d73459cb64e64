//! Error types for dialogue_core

use std::path::PathBuf;
use thiserror::Error;

/// Dialogue engine error type
#[derive(Debug, Error)]
pub enum Error {
    /// A corpus source produced no nodes at all
    #[error("corpus '{source_name}' contains no nodes")]
    EmptyCorpus { source_name: String },

    /// The corpus directory does not exist
    #[error("corpus directory not found: {}", .0.display())]
    CorpusNotFound(PathBuf),

    /// IO error while reading corpus files
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] corpus_model::ConfigError),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

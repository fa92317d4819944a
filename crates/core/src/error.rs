use std::io;
use std::path::PathBuf;

/// Errors that can occur during module resolution
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to enumerate {}: {source}", root.display())]
    EnumerationError {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to read module header from {}: {reason}", path.display())]
    MetadataReadError { path: PathBuf, reason: String },

    #[error("Failed to load {}: {reason}", path.display())]
    LoadError { path: PathBuf, reason: String },

    #[error("Invalid module version: {0}")]
    VersionError(String),

    #[error("Container error: {0}")]
    ContainerError(String),
}

impl Error {
    pub(crate) fn metadata(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::MetadataReadError {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::LoadError {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for resolver operations
pub type Result<T> = std::result::Result<T, Error>;

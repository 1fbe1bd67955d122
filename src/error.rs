//! Error taxonomy.
//!
//! Every variant is fatal for a dataset build: nothing is retried or skipped,
//! the error propagates to the binary and aborts the run.
use std::path::PathBuf;

/// Errors produced by the `ictal` library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required configuration value is absent or unusable.
    #[error("configuration error: {key}: {message}")]
    Config { key: String, message: String },

    /// The output directory holds files other than the slices metadata.
    #[error("output path {} contains files other than {expected}: {}", dir.display(), found.join(", "))]
    OutputConflict {
        dir: PathBuf,
        expected: String,
        found: Vec<String>,
    },

    /// A recording could not be read, or the channel whitelist is not satisfied.
    #[error("failed to load {}: {message}", path.display())]
    Load { path: PathBuf, message: String },

    /// The slices metadata file is missing or malformed.
    #[error("invalid slices metadata {}: {message}", path.display())]
    Metadata { path: PathBuf, message: String },

    /// The window store rejected an operation or is corrupt.
    #[error("window store error: {0}")]
    Store(String),

    /// Threshold used before fitting, fitted on nothing, or unreadable.
    #[error("threshold error: {0}")]
    Threshold(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn config(key: &str, message: impl Into<String>) -> Self {
        Error::Config { key: key.to_string(), message: message.into() }
    }

    pub(crate) fn load(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Load { path: path.into(), message: message.into() }
    }

    pub(crate) fn metadata(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Metadata { path: path.into(), message: message.into() }
    }
}

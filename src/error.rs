//! Error types for scanning and compression.
//!
//! Validation errors (`InvalidPath`, `SourceNotFound`, `InvalidDestination`)
//! are raised before any network call. Deletion problems never show up here;
//! they are reported through `CompressionResult::deletion_skipped`.

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CompressorError {
    #[error("Invalid path {}: {}", path.display(), reason)]
    InvalidPath { path: PathBuf, reason: String },

    #[error("File does not exist: {}", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("Invalid destination {}: {}", path.display(), reason)]
    InvalidDestination { path: PathBuf, reason: String },

    /// Non-success answer (or no answer at all, status 0) from the compression service
    #[error("Compression service error {status}: {body}")]
    CompressionService { status: u16, body: String },

    #[error("Failed to write {}: {}", path.display(), source)]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CompressorError {
    /// Stable machine-readable code used in JSON output
    pub fn code(&self) -> &'static str {
        match self {
            CompressorError::InvalidPath { .. } => "INVALID_PATH",
            CompressorError::SourceNotFound { .. } => "SOURCE_NOT_FOUND",
            CompressorError::InvalidDestination { .. } => "INVALID_DESTINATION",
            CompressorError::CompressionService { .. } => "COMPRESSION_SERVICE_ERROR",
            CompressorError::WriteFailure { .. } => "WRITE_FAILURE",
            CompressorError::Config(_) => "CONFIG_ERROR",
            CompressorError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// The path the error is about, when there is one
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            CompressorError::InvalidPath { path, .. }
            | CompressorError::SourceNotFound { path }
            | CompressorError::InvalidDestination { path, .. }
            | CompressorError::WriteFailure { path, .. } => Some(path),
            _ => None,
        }
    }

    pub(crate) fn invalid_path(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        CompressorError::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_destination(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        CompressorError::InvalidDestination {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CompressorError>;

//! Error types for the archive module.

use thiserror::Error;

use crate::artifacts::ArtifactError;

/// Errors raised while building an artifact bundle.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// There are no artifacts to bundle.
    #[error("No audio files available")]
    NotFound,

    /// Listing the artifacts failed.
    #[error(transparent)]
    Artifacts(#[from] ArtifactError),

    /// Failed writing the zip archive.
    #[error("Failed to write archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// I/O error on the temporary bundle.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The blocking build task panicked or was cancelled.
    #[error("Archive task failed: {0}")]
    Task(String),
}

//! Error types for the artifacts module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the output artifact store.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// The name does not resolve to an existing artifact.
    #[error("File not found: {0}")]
    NotFound(String),

    /// The name tries to leave the audio directory.
    #[error("Invalid artifact name: {0:?}")]
    InvalidName(String),

    /// No stats record has been written yet.
    #[error("No stats available")]
    StatsNotFound,

    /// The stats record exists but is not a JSON object.
    #[error("Stats record is corrupt: {reason}")]
    CorruptData { reason: String },

    /// Clearing stopped at the first failed deletion.
    #[error("Deleted {deleted} file(s) before failing: {source}")]
    PartialClear {
        deleted: usize,
        #[source]
        source: std::io::Error,
    },

    /// Filesystem failure under the output root.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ArtifactError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error means "nothing there" rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::InvalidName(_) | Self::StatsNotFound
        )
    }
}

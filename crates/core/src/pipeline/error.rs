//! Error types for the pipeline module.

use std::path::PathBuf;
use thiserror::Error;

use crate::staging::StagingError;

/// Errors reported by a [`Pipeline`](super::Pipeline) implementation.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The pipeline ran and reported a failure.
    #[error("{message}")]
    Failed { message: String },

    /// The pipeline program could not be started.
    #[error("Failed to start pipeline program {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The pipeline finished but its result could not be parsed.
    #[error("Pipeline produced invalid output: {reason}")]
    InvalidOutput { reason: String },

    /// I/O error while talking to the pipeline.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Creates a failure carrying the pipeline's own message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }
}

/// Errors returned by [`PipelineInvoker::convert`](super::PipelineInvoker::convert).
#[derive(Debug, Error)]
pub enum ConvertError {
    /// No document, or more than one, is staged.
    #[error(transparent)]
    Staging(#[from] StagingError),

    /// The pipeline failed; only its message is kept.
    #[error("{message}")]
    PipelineFailure { message: String },

    /// The pipeline exceeded the configured timeout and was cancelled.
    #[error("Pipeline timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },
}

impl From<PipelineError> for ConvertError {
    fn from(error: PipelineError) -> Self {
        Self::PipelineFailure {
            message: error.to_string(),
        }
    }
}

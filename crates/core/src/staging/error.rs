//! Error types for the staging module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the upload slot.
#[derive(Debug, Error)]
pub enum StagingError {
    /// Missing file part, empty filename, or wrong extension.
    #[error("{reason}")]
    InvalidInput { reason: String },

    /// The staging directory is absent or holds no document.
    #[error(
        "No {} file found. Please upload a {} first.",
        .extension.to_uppercase(),
        .extension.to_uppercase()
    )]
    NoDocument { extension: String },

    /// More than one document is staged.
    #[error("Multiple {} files found ({count})", .extension.to_uppercase())]
    AmbiguousState { count: usize, extension: String },

    /// Filesystem failure inside the staging directory.
    #[error("Staging I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StagingError {
    /// Creates an invalid input error.
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the caller sent a bad request (as opposed to a server-side failure).
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Io { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_use_uppercase_extension() {
        let err = StagingError::NoDocument {
            extension: "pdf".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "No PDF file found. Please upload a PDF first."
        );

        let err = StagingError::AmbiguousState {
            count: 2,
            extension: "pdf".to_string(),
        };
        assert_eq!(err.to_string(), "Multiple PDF files found (2)");
    }

    #[test]
    fn test_client_error_classification() {
        assert!(StagingError::invalid_input("No file selected").is_client_error());
        let io = StagingError::io(
            "uploads",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(!io.is_client_error());
    }
}

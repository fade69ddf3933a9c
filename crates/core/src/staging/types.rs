//! Types for the staging module.

use serde::Serialize;
use std::path::PathBuf;

/// The document currently occupying the upload slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StagedDocument {
    /// Name as stored in the staging directory.
    pub filename: String,
    /// Absolute location on disk (never exposed over the API).
    #[serde(skip)]
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
}

impl StagedDocument {
    pub(crate) fn new(filename: String, path: PathBuf, size: u64) -> Self {
        let path = std::path::absolute(&path).unwrap_or(path);
        Self {
            filename,
            path,
            size,
        }
    }
}

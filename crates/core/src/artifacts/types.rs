//! Types for the artifacts module.

use serde::Serialize;
use tokio::fs::File;

/// A generated audio file under `<output_root>/audio`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub name: String,
    /// Size in bytes.
    pub size: u64,
}

/// An artifact opened for download.
#[derive(Debug)]
pub struct ArtifactFile {
    pub artifact: Artifact,
    pub file: File,
}

/// Summary of the most recent conversion run, as written by the pipeline.
pub type StatsRecord = serde_json::Map<String, serde_json::Value>;

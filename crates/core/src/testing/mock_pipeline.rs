//! Mock pipeline for testing.

use async_trait::async_trait;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::RwLock;

use crate::files::file_name;
use crate::pipeline::{Pipeline, PipelineError, PipelineOutput};

/// Mock implementation of the Pipeline trait.
///
/// Provides controllable behavior for testing:
/// - Records every document path it was run on
/// - Writes configurable audio artifacts and a stats record under the output root
/// - Simulates failure (after writing artifacts, like a pipeline dying midway)
/// - Simulates slow runs for timeout tests
#[derive(Debug)]
pub struct MockPipeline {
    output_root: PathBuf,
    /// Documents the pipeline was run on.
    calls: RwLock<Vec<PathBuf>>,
    /// Artifacts written on every run, as (file name, content).
    artifacts: RwLock<Vec<(String, Vec<u8>)>>,
    /// If set, the next run fails with this error.
    next_error: RwLock<Option<PipelineError>>,
    /// Simulated run duration.
    delay: RwLock<Option<Duration>>,
}

impl MockPipeline {
    /// Create a mock writing two small artifacts into `output_root`.
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
            calls: RwLock::new(Vec::new()),
            artifacts: RwLock::new(vec![
                ("part_001.mp3".to_string(), b"ID3\x03mock-audio-one".to_vec()),
                ("part_002.mp3".to_string(), b"ID3\x03mock-audio-two".to_vec()),
            ]),
            next_error: RwLock::new(None),
            delay: RwLock::new(None),
        }
    }

    /// Replace the artifacts written on each run.
    pub async fn set_artifacts(&self, artifacts: Vec<(String, Vec<u8>)>) {
        *self.artifacts.write().await = artifacts;
    }

    /// Make the next run fail with `error`.
    pub async fn fail_next(&self, error: PipelineError) {
        *self.next_error.write().await = Some(error);
    }

    /// Sleep this long before doing any work.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// Documents the pipeline was run on, in call order.
    pub async fn calls(&self) -> Vec<PathBuf> {
        self.calls.read().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }

    async fn write_artifacts(&self) -> Result<Vec<String>, PipelineError> {
        let audio_dir = self.output_root.join("audio");
        tokio::fs::create_dir_all(&audio_dir).await?;

        let artifacts = self.artifacts.read().await;
        for (name, content) in artifacts.iter() {
            tokio::fs::write(audio_dir.join(name), content).await?;
        }
        Ok(artifacts.iter().map(|(name, _)| name.clone()).collect())
    }
}

#[async_trait]
impl Pipeline for MockPipeline {
    fn name(&self) -> &str {
        "mock"
    }

    async fn run(&self, document: &Path) -> Result<PipelineOutput, PipelineError> {
        self.calls.write().await.push(document.to_path_buf());

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let files = self.write_artifacts().await?;

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        let stats = json!({
            "source": file_name(document),
            "chunks": files.len(),
            "files": files,
        });
        let metadata_dir = self.output_root.join("metadata");
        tokio::fs::create_dir_all(&metadata_dir).await?;
        tokio::fs::write(metadata_dir.join("stats.json"), stats.to_string()).await?;

        Ok(json!({
            "success": true,
            "document": file_name(document),
            "files": files,
        }))
    }
}

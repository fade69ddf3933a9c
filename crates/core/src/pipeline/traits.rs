//! Trait definitions for the pipeline module.

use async_trait::async_trait;
use std::path::Path;

use super::error::PipelineError;

/// Structured result reported by the pipeline. Opaque to this crate.
pub type PipelineOutput = serde_json::Value;

/// An external document-to-audio transformation.
///
/// Implementations write audio artifacts under `<output_root>/audio` and the
/// stats record under `<output_root>/metadata`; this crate only reads and
/// deletes there.
#[async_trait]
pub trait Pipeline: Send + Sync {
    /// Returns the name of this pipeline implementation.
    fn name(&self) -> &str;

    /// Transforms the document at `document`, returning the pipeline's own result.
    async fn run(&self, document: &Path) -> Result<PipelineOutput, PipelineError>;
}

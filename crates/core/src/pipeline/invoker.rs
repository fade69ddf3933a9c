//! Runs the pipeline against the staged document.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{error, info};

use super::error::ConvertError;
use super::traits::{Pipeline, PipelineOutput};
use crate::metrics::{CONVERSIONS_TOTAL, CONVERSION_DURATION};
use crate::staging::UploadSlot;

/// Calls the pipeline exactly once per request on the single staged document.
///
/// Artifacts the pipeline wrote before failing are left in place.
#[derive(Clone)]
pub struct PipelineInvoker {
    slot: UploadSlot,
    pipeline: Arc<dyn Pipeline>,
    timeout: Option<Duration>,
}

impl PipelineInvoker {
    /// Creates an invoker with no timeout.
    pub fn new(slot: UploadSlot, pipeline: Arc<dyn Pipeline>) -> Self {
        Self {
            slot,
            pipeline,
            timeout: None,
        }
    }

    /// Cancels the pipeline after `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// The pipeline implementation in use.
    pub fn pipeline_name(&self) -> &str {
        self.pipeline.name()
    }

    /// Converts the staged document.
    pub async fn convert(&self) -> Result<PipelineOutput, ConvertError> {
        let document = self.slot.current_document().await?;

        info!(
            "Converting {} with pipeline '{}'",
            document.filename,
            self.pipeline.name()
        );
        let start = Instant::now();

        let outcome = match self.timeout {
            Some(limit) => match timeout(limit, self.pipeline.run(&document.path)).await {
                Ok(result) => result.map_err(ConvertError::from),
                Err(_) => Err(ConvertError::Timeout {
                    timeout_secs: limit.as_secs(),
                }),
            },
            None => self
                .pipeline
                .run(&document.path)
                .await
                .map_err(ConvertError::from),
        };

        let elapsed = start.elapsed().as_secs_f64();
        let result_label = match &outcome {
            Ok(_) => "success",
            Err(ConvertError::Timeout { .. }) => "timeout",
            Err(_) => "failure",
        };
        CONVERSIONS_TOTAL.with_label_values(&[result_label]).inc();
        CONVERSION_DURATION
            .with_label_values(&[result_label])
            .observe(elapsed);

        match &outcome {
            Ok(_) => info!("Converted {} in {:.1}s", document.filename, elapsed),
            Err(e) => error!("Conversion of {} failed: {}", document.filename, e),
        }

        outcome
    }
}

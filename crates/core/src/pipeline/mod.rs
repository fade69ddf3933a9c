//! Pipeline module for invoking the external document-to-audio transformation.
//!
//! The transformation itself is opaque: anything implementing [`Pipeline`]
//! can be plugged in. [`CommandPipeline`] runs an external program;
//! [`PipelineInvoker`] ties a pipeline to the upload slot and applies the
//! optional timeout.
//!
//! # Example
//!
//! ```ignore
//! use lectern_core::pipeline::{CommandPipeline, PipelineInvoker};
//! use lectern_core::staging::UploadSlot;
//!
//! let slot = UploadSlot::new("uploads", "pdf");
//! let pipeline = Arc::new(CommandPipeline::new("/usr/local/bin/narrate", "output"));
//! let invoker = PipelineInvoker::new(slot, pipeline)
//!     .with_timeout(Some(Duration::from_secs(600)));
//!
//! let result = invoker.convert().await?;
//! println!("Pipeline reported: {}", result);
//! ```

mod command;
mod error;
mod invoker;
mod traits;

pub use command::{CommandPipeline, OUTPUT_DIR_ENV};
pub use error::{ConvertError, PipelineError};
pub use invoker::PipelineInvoker;
pub use traits::{Pipeline, PipelineOutput};

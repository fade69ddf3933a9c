//! Testing utilities and mock implementations.
//!
//! [`MockPipeline`] stands in for the external transformation so the
//! lifecycle can be exercised end to end without a real converter.
//!
//! # Example
//!
//! ```rust,ignore
//! use lectern_core::testing::MockPipeline;
//!
//! let pipeline = MockPipeline::new(output_root);
//! pipeline
//!     .set_artifacts(vec![("part_001.mp3".to_string(), b"audio".to_vec())])
//!     .await;
//!
//! // Use in Lectern::new(...)
//! ```

mod mock_pipeline;

pub use mock_pipeline::MockPipeline;

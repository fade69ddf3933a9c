//! Output artifact store.
//!
//! Read and delete access to what the pipeline left under the output root:
//! audio files in `audio/` and the stats record at `metadata/stats.json`.
//! The pipeline is the only writer there.

mod error;
mod store;
mod types;

pub use error::ArtifactError;
pub use store::ArtifactStore;
pub use types::{Artifact, ArtifactFile, StatsRecord};

pub mod archive;
pub mod artifacts;
pub mod config;
mod files;
pub mod lifecycle;
pub mod metrics;
pub mod pipeline;
pub mod staging;
pub mod testing;

pub use archive::{ArchiveBuilder, ArchiveError, Bundle, BundleReader};
pub use artifacts::{Artifact, ArtifactError, ArtifactFile, ArtifactStore, StatsRecord};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, PipelineConfig,
    SanitizedConfig, ServerConfig, StorageConfig,
};
pub use lifecycle::Lectern;
pub use pipeline::{
    CommandPipeline, ConvertError, Pipeline, PipelineError, PipelineInvoker, PipelineOutput,
};
pub use staging::{StagedDocument, StagingError, UploadSlot};

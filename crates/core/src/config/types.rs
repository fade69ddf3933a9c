use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound on request bodies, enforced by the router before any handler runs.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Directory served for any path outside the API (presentation layer).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
            static_dir: None,
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(std::net::Ipv4Addr::LOCALHOST)
}

fn default_port() -> u16 {
    5000
}

/// 50 MiB
pub const DEFAULT_MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

/// Filesystem layout for the staging area and the output root.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Single-slot staging directory for the source document.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
    /// Root holding `audio/` and `metadata/`.
    #[serde(default = "default_output_root")]
    pub output_root: PathBuf,
    /// Accepted source document extension, without the dot.
    #[serde(default = "default_document_extension")]
    pub document_extension: String,
    /// Extension of generated audio artifacts, without the dot.
    #[serde(default = "default_audio_extension")]
    pub audio_extension: String,
    /// Download name for the artifact bundle.
    #[serde(default = "default_bundle_name")]
    pub bundle_name: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            output_root: default_output_root(),
            document_extension: default_document_extension(),
            audio_extension: default_audio_extension(),
            bundle_name: default_bundle_name(),
        }
    }
}

impl StorageConfig {
    /// Creates a storage layout rooted at the given directories with default extensions.
    pub fn new(upload_dir: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            output_root: output_root.into(),
            ..Default::default()
        }
    }

    /// `<output_root>/audio`
    pub fn audio_dir(&self) -> PathBuf {
        self.output_root.join("audio")
    }

    /// `<output_root>/metadata`
    pub fn metadata_dir(&self) -> PathBuf {
        self.output_root.join("metadata")
    }

    /// `<output_root>/metadata/stats.json`
    pub fn stats_path(&self) -> PathBuf {
        self.metadata_dir().join("stats.json")
    }
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_output_root() -> PathBuf {
    PathBuf::from("output")
}

fn default_document_extension() -> String {
    "pdf".to_string()
}

fn default_audio_extension() -> String {
    "mp3".to_string()
}

fn default_bundle_name() -> String {
    "audiolibro.zip".to_string()
}

/// External transformation pipeline configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Program to run; the staged document path is passed as the last argument.
    #[serde(default)]
    pub program: Option<PathBuf>,
    /// Arguments placed before the document path.
    #[serde(default)]
    pub args: Vec<String>,
    /// Abort the pipeline after this many seconds. Unbounded when unset.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Working directory for the pipeline process.
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
}

/// Sanitized config for API responses (pipeline arguments hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub pipeline: SanitizedPipelineConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedPipelineConfig {
    pub program: Option<PathBuf>,
    pub arg_count: usize,
    pub timeout_secs: Option<u64>,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            storage: config.storage.clone(),
            pipeline: SanitizedPipelineConfig {
                program: config.pipeline.program.clone(),
                arg_count: config.pipeline.args.len(),
                timeout_secs: config.pipeline.timeout_secs,
            },
        }
    }
}

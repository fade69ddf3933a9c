//! File system backed artifact store.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

use super::error::ArtifactError;
use super::types::{Artifact, ArtifactFile, StatsRecord};
use crate::config::StorageConfig;
use crate::files::{file_name, has_extension, list_files_with_extension};
use crate::metrics::ARTIFACTS_DELETED;

/// Enumerates, serves and deletes audio artifacts under a fixed output root.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    output_root: PathBuf,
    audio_extension: String,
}

impl ArtifactStore {
    /// Creates a store over `output_root` for artifacts with extension `audio_extension` (no dot).
    pub fn new(output_root: impl Into<PathBuf>, audio_extension: impl Into<String>) -> Self {
        Self {
            output_root: output_root.into(),
            audio_extension: audio_extension.into(),
        }
    }

    /// Creates a store from the storage section of the config.
    pub fn from_config(storage: &StorageConfig) -> Self {
        Self::new(&storage.output_root, &storage.audio_extension)
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    pub fn audio_dir(&self) -> PathBuf {
        self.output_root.join("audio")
    }

    pub fn stats_path(&self) -> PathBuf {
        self.output_root.join("metadata").join("stats.json")
    }

    /// Paths of every current artifact, sorted by name. Missing directories yield nothing.
    pub(crate) async fn artifact_paths(&self) -> Result<Vec<PathBuf>, ArtifactError> {
        let dir = self.audio_dir();
        let paths = list_files_with_extension(&dir, &self.audio_extension)
            .await
            .map_err(|e| ArtifactError::io(&dir, e))?;
        Ok(paths.unwrap_or_default())
    }

    /// Lists every artifact with its size, sorted by name.
    ///
    /// Returns an empty list when the output root or `audio/` does not exist yet.
    pub async fn list(&self) -> Result<Vec<Artifact>, ArtifactError> {
        let mut artifacts = Vec::new();
        for path in self.artifact_paths().await? {
            let metadata = match fs::metadata(&path).await {
                Ok(m) => m,
                // Deleted between listing and stat
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(ArtifactError::io(&path, e)),
            };
            artifacts.push(Artifact {
                name: file_name(&path),
                size: metadata.len(),
            });
        }
        debug!("Listed {} artifact(s)", artifacts.len());
        Ok(artifacts)
    }

    /// Maps an artifact name to its path inside `audio/`, rejecting anything
    /// that could resolve outside of it.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, ArtifactError> {
        if name.is_empty()
            || name == "."
            || name == ".."
            || name.contains(['/', '\\', '\0'])
        {
            warn!("Rejected artifact name {:?}", name);
            return Err(ArtifactError::InvalidName(name.to_string()));
        }

        let path = Path::new(name);
        if path.is_absolute() || path.components().count() != 1 {
            return Err(ArtifactError::InvalidName(name.to_string()));
        }

        if !has_extension(path, &self.audio_extension) {
            return Err(ArtifactError::NotFound(name.to_string()));
        }

        Ok(self.audio_dir().join(name))
    }

    /// Opens a single artifact for download.
    pub async fn open(&self, name: &str) -> Result<ArtifactFile, ArtifactError> {
        let path = self.resolve(name)?;

        let metadata = match fs::metadata(&path).await {
            Ok(m) if m.is_file() => m,
            Ok(_) => return Err(ArtifactError::NotFound(name.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ArtifactError::NotFound(name.to_string()))
            }
            Err(e) => return Err(ArtifactError::io(&path, e)),
        };

        let file = fs::File::open(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ArtifactError::NotFound(name.to_string())
            } else {
                ArtifactError::io(&path, e)
            }
        })?;

        Ok(ArtifactFile {
            artifact: Artifact {
                name: name.to_string(),
                size: metadata.len(),
            },
            file,
        })
    }

    /// Deletes every artifact and returns how many were removed.
    ///
    /// A missing `audio/` directory is a no-op returning 0. Deletion stops at
    /// the first failure; files removed before that stay removed and the
    /// count is carried in [`ArtifactError::PartialClear`].
    pub async fn clear(&self) -> Result<usize, ArtifactError> {
        let paths = self.artifact_paths().await?;

        let mut deleted = 0;
        for path in &paths {
            match fs::remove_file(path).await {
                Ok(()) => deleted += 1,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    warn!("Failed to delete {:?} after {} deletion(s): {}", path, deleted, e);
                    ARTIFACTS_DELETED.inc_by(deleted as u64);
                    return Err(ArtifactError::PartialClear { deleted, source: e });
                }
            }
        }

        ARTIFACTS_DELETED.inc_by(deleted as u64);
        info!("Cleared {} artifact(s)", deleted);
        Ok(deleted)
    }

    /// Reads the stats record of the most recent conversion.
    pub async fn stats(&self) -> Result<StatsRecord, ArtifactError> {
        let path = self.stats_path();
        let content = match fs::read(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ArtifactError::StatsNotFound)
            }
            Err(e) => return Err(ArtifactError::io(&path, e)),
        };

        serde_json::from_slice::<StatsRecord>(&content).map_err(|e| ArtifactError::CorruptData {
            reason: e.to_string(),
        })
    }
}

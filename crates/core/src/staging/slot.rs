//! Single-slot staging directory.

use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncRead, AsyncWriteExt};
use tracing::{debug, info, warn};

use super::error::StagingError;
use super::types::StagedDocument;
use crate::config::StorageConfig;
use crate::files::{file_name, has_extension, list_files_with_extension};
use crate::metrics::UPLOADS_TOTAL;

/// Owns the staging directory and keeps at most one document in it.
#[derive(Debug, Clone)]
pub struct UploadSlot {
    dir: PathBuf,
    extension: String,
}

impl UploadSlot {
    /// Creates a slot over `dir` accepting files with extension `extension` (no dot).
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
        }
    }

    /// Creates a slot from the storage section of the config.
    pub fn from_config(storage: &StorageConfig) -> Self {
        Self::new(&storage.upload_dir, &storage.document_extension)
    }

    /// The staging directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The accepted document extension.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Checks an uploaded filename and reduces it to its final path component.
    ///
    /// Clients may send a full client-side path (`C:\docs\book.pdf`); only the
    /// last component is ever used as the staged name.
    pub fn sanitize_filename(&self, filename: &str) -> Result<String, StagingError> {
        if filename.is_empty() {
            return Err(StagingError::invalid_input("No file selected"));
        }

        let name = filename
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default()
            .trim();

        if name.is_empty() || name == "." || name == ".." || name.contains('\0') {
            return Err(StagingError::invalid_input(format!(
                "Invalid filename: {:?}",
                filename
            )));
        }

        if !has_extension(Path::new(name), &self.extension) {
            return Err(StagingError::invalid_input(format!(
                "File must be a {}",
                self.extension.to_uppercase()
            )));
        }

        Ok(name.to_string())
    }

    /// Stages a new document, removing every previously staged document first.
    ///
    /// Nothing in the staging directory is touched when the filename is rejected.
    /// The content is written to a hidden `.part` file and renamed into place,
    /// so a failed write never leaves a half-written document in the slot.
    pub async fn accept<R>(
        &self,
        filename: &str,
        mut content: R,
    ) -> Result<StagedDocument, StagingError>
    where
        R: AsyncRead + Unpin,
    {
        let name = match self.sanitize_filename(filename) {
            Ok(name) => name,
            Err(e) => {
                warn!("Rejected upload {:?}: {}", filename, e);
                UPLOADS_TOTAL.with_label_values(&["rejected"]).inc();
                return Err(e);
            }
        };

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StagingError::io(&self.dir, e))?;

        let removed = self.remove_staged().await?;
        if removed > 0 {
            debug!("Removed {} previously staged document(s)", removed);
        }

        let final_path = self.dir.join(&name);
        let part_path = self.dir.join(format!(".{}.part", name));

        let size = match Self::write_part(&part_path, &mut content).await {
            Ok(size) => size,
            Err(e) => {
                let _ = fs::remove_file(&part_path).await;
                UPLOADS_TOTAL.with_label_values(&["failed"]).inc();
                return Err(StagingError::io(&part_path, e));
            }
        };

        if let Err(e) = fs::rename(&part_path, &final_path).await {
            let _ = fs::remove_file(&part_path).await;
            UPLOADS_TOTAL.with_label_values(&["failed"]).inc();
            return Err(StagingError::io(&final_path, e));
        }

        info!("Staged document {} ({} bytes)", name, size);
        UPLOADS_TOTAL.with_label_values(&["accepted"]).inc();

        Ok(StagedDocument::new(name, final_path, size))
    }

    async fn write_part<R>(path: &Path, content: &mut R) -> std::io::Result<u64>
    where
        R: AsyncRead + Unpin,
    {
        let mut file = fs::File::create(path).await?;
        let size = tokio::io::copy(content, &mut file).await?;
        file.flush().await?;
        file.sync_all().await?;
        Ok(size)
    }

    /// Returns the single staged document.
    pub async fn current_document(&self) -> Result<StagedDocument, StagingError> {
        let documents = self.staged_paths().await?;

        match documents.as_slice() {
            [] => Err(StagingError::NoDocument {
                extension: self.extension.clone(),
            }),
            [path] => {
                let metadata = fs::metadata(path)
                    .await
                    .map_err(|e| StagingError::io(path, e))?;
                Ok(StagedDocument::new(file_name(path), path.clone(), metadata.len()))
            }
            many => {
                warn!(
                    "Staging directory {:?} holds {} documents",
                    self.dir,
                    many.len()
                );
                Err(StagingError::AmbiguousState {
                    count: many.len(),
                    extension: self.extension.clone(),
                })
            }
        }
    }

    /// All document-type files currently in the staging directory.
    async fn staged_paths(&self) -> Result<Vec<PathBuf>, StagingError> {
        list_files_with_extension(&self.dir, &self.extension)
            .await
            .map(Option::unwrap_or_default)
            .map_err(|e| StagingError::io(&self.dir, e))
    }

    /// Deletes every staged document, regardless of name. Returns how many were removed.
    async fn remove_staged(&self) -> Result<usize, StagingError> {
        let documents = self.staged_paths().await?;
        for path in &documents {
            fs::remove_file(path)
                .await
                .map_err(|e| StagingError::io(path, e))?;
        }
        Ok(documents.len())
    }
}

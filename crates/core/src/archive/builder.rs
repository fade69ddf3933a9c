use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::bundle::Bundle;
use super::error::ArchiveError;
use crate::artifacts::ArtifactStore;
use crate::files::file_name;
use crate::metrics::BUNDLES_BUILT;

/// Packs all current artifacts into a single deflated zip.
#[derive(Debug, Clone)]
pub struct ArchiveBuilder {
    store: ArtifactStore,
}

impl ArchiveBuilder {
    pub fn new(store: ArtifactStore) -> Self {
        Self { store }
    }

    /// Builds a bundle of every artifact currently in `audio/`.
    pub async fn build(&self) -> Result<Bundle, ArchiveError> {
        let result = self.build_inner().await;
        let label = match &result {
            Ok(_) => "success",
            Err(ArchiveError::NotFound) => "empty",
            Err(_) => "failure",
        };
        BUNDLES_BUILT.with_label_values(&[label]).inc();
        result
    }

    async fn build_inner(&self) -> Result<Bundle, ArchiveError> {
        let paths = self.store.artifact_paths().await?;
        if paths.is_empty() {
            return Err(ArchiveError::NotFound);
        }

        let bundle = tokio::task::spawn_blocking(move || write_bundle(paths))
            .await
            .map_err(|e| ArchiveError::Task(e.to_string()))??;

        info!(
            "Built bundle with {} artifact(s), {} bytes",
            bundle.entries(),
            bundle.size()
        );
        Ok(bundle)
    }
}

fn write_bundle(paths: Vec<PathBuf>) -> Result<Bundle, ArchiveError> {
    // Dropping `temp` on any early return removes the partial archive.
    let mut temp = tempfile::Builder::new()
        .prefix("lectern-bundle-")
        .suffix(".zip")
        .tempfile()?;

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut entries = 0;
    {
        let mut zip = ZipWriter::new(temp.as_file_mut());
        for path in &paths {
            let mut source = match File::open(path) {
                Ok(f) => f,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    warn!("Artifact {:?} disappeared while bundling", path);
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            let name = file_name(path);
            debug!("Adding {} to bundle", name);
            zip.start_file(name, options)?;
            io::copy(&mut source, &mut zip)?;
            entries += 1;
        }
        zip.finish()?;
    }

    if entries == 0 {
        return Err(ArchiveError::NotFound);
    }

    let size = temp.as_file().metadata()?.len();
    Ok(Bundle::new(temp.into_temp_path(), size, entries))
}

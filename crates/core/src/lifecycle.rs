//! Upload slot and output artifact lifecycle.
//!
//! [`Lectern`] composes the upload slot, pipeline invoker, artifact store and
//! archive builder over one staging directory and one output root. Every
//! operation that mutates the staging area or the artifact set (upload,
//! convert, clear, bundle) runs under a single async mutex, so concurrent
//! requests cannot interleave a listing with a delete or leave two documents
//! staged. Read-only operations are not serialised.
//!
//! A conversion holds the mutex for the whole pipeline run; an upload that
//! arrives meanwhile waits for it instead of replacing the document the
//! pipeline is reading.

use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncRead;
use tokio::sync::Mutex;

use crate::archive::{ArchiveBuilder, ArchiveError, Bundle};
use crate::artifacts::{Artifact, ArtifactError, ArtifactFile, ArtifactStore, StatsRecord};
use crate::config::{Config, StorageConfig};
use crate::pipeline::{ConvertError, Pipeline, PipelineInvoker, PipelineOutput};
use crate::staging::{StagedDocument, StagingError, UploadSlot};

pub struct Lectern {
    slot: UploadSlot,
    invoker: PipelineInvoker,
    store: ArtifactStore,
    archive: ArchiveBuilder,
    mutations: Mutex<()>,
}

impl Lectern {
    /// Creates the lifecycle over the given storage layout with no pipeline timeout.
    pub fn new(storage: &StorageConfig, pipeline: Arc<dyn Pipeline>) -> Self {
        let slot = UploadSlot::from_config(storage);
        let store = ArtifactStore::from_config(storage);
        Self {
            invoker: PipelineInvoker::new(slot.clone(), pipeline),
            archive: ArchiveBuilder::new(store.clone()),
            slot,
            store,
            mutations: Mutex::new(()),
        }
    }

    /// Creates the lifecycle from the full config, applying the pipeline timeout.
    pub fn from_config(config: &Config, pipeline: Arc<dyn Pipeline>) -> Self {
        Self::new(&config.storage, pipeline)
            .with_timeout(config.pipeline.timeout_secs.map(Duration::from_secs))
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.invoker = self.invoker.with_timeout(timeout);
        self
    }

    pub fn slot(&self) -> &UploadSlot {
        &self.slot
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    pub fn pipeline_name(&self) -> &str {
        self.invoker.pipeline_name()
    }

    /// Stages a document, replacing any previous one.
    pub async fn upload<R>(
        &self,
        filename: &str,
        content: R,
    ) -> Result<StagedDocument, StagingError>
    where
        R: AsyncRead + Unpin,
    {
        let _guard = self.mutations.lock().await;
        self.slot.accept(filename, content).await
    }

    pub async fn current_document(&self) -> Result<StagedDocument, StagingError> {
        self.slot.current_document().await
    }

    /// Runs the pipeline on the staged document.
    pub async fn convert(&self) -> Result<PipelineOutput, ConvertError> {
        let _guard = self.mutations.lock().await;
        self.invoker.convert().await
    }

    pub async fn list_artifacts(&self) -> Result<Vec<Artifact>, ArtifactError> {
        self.store.list().await
    }

    pub async fn open_artifact(&self, name: &str) -> Result<ArtifactFile, ArtifactError> {
        self.store.open(name).await
    }

    /// Deletes every artifact, returning the count.
    pub async fn clear_artifacts(&self) -> Result<usize, ArtifactError> {
        let _guard = self.mutations.lock().await;
        self.store.clear().await
    }

    pub async fn stats(&self) -> Result<StatsRecord, ArtifactError> {
        self.store.stats().await
    }

    /// Bundles every artifact into a temporary zip.
    pub async fn build_archive(&self) -> Result<Bundle, ArchiveError> {
        let _guard = self.mutations.lock().await;
        self.archive.build().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockPipeline;
    use std::io::Read;
    use tempfile::TempDir;
    use tokio::io::AsyncReadExt;

    fn setup(temp: &TempDir) -> (Arc<Lectern>, Arc<MockPipeline>) {
        let storage =
            StorageConfig::new(temp.path().join("uploads"), temp.path().join("output"));
        let pipeline = Arc::new(MockPipeline::new(&storage.output_root));
        let lectern = Arc::new(Lectern::new(&storage, pipeline.clone()));
        (lectern, pipeline)
    }

    #[tokio::test]
    async fn test_full_round_trip() {
        let temp = TempDir::new().unwrap();
        let (lectern, pipeline) = setup(&temp);

        assert!(matches!(
            lectern.stats().await.unwrap_err(),
            ArtifactError::StatsNotFound
        ));

        lectern.upload("book.pdf", &b"%PDF-1.7"[..]).await.unwrap();
        let output = lectern.convert().await.unwrap();
        assert_eq!(output["document"], "book.pdf");
        assert_eq!(pipeline.call_count().await, 1);

        let artifacts = lectern.list_artifacts().await.unwrap();
        let names: Vec<&str> = artifacts.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["part_001.mp3", "part_002.mp3"]);

        for artifact in &artifacts {
            let mut opened = lectern.open_artifact(&artifact.name).await.unwrap();
            let mut served = Vec::new();
            opened.file.read_to_end(&mut served).await.unwrap();
            let on_disk = std::fs::read(lectern.store().audio_dir().join(&artifact.name)).unwrap();
            assert_eq!(served, on_disk);
            assert_eq!(artifact.size, on_disk.len() as u64);
        }

        let bundle = lectern.build_archive().await.unwrap();
        let mut archive =
            zip::ZipArchive::new(std::fs::File::open(bundle.path()).unwrap()).unwrap();
        assert_eq!(archive.len(), artifacts.len());
        for artifact in &artifacts {
            let mut content = Vec::new();
            archive
                .by_name(&artifact.name)
                .unwrap()
                .read_to_end(&mut content)
                .unwrap();
            let on_disk = std::fs::read(lectern.store().audio_dir().join(&artifact.name)).unwrap();
            assert_eq!(content, on_disk);
        }

        let stats = lectern.stats().await.unwrap();
        assert_eq!(stats["source"], "book.pdf");

        assert_eq!(lectern.clear_artifacts().await.unwrap(), 2);
        assert_eq!(lectern.clear_artifacts().await.unwrap(), 0);
        assert!(matches!(
            lectern.build_archive().await.unwrap_err(),
            ArchiveError::NotFound
        ));
    }

    #[tokio::test]
    async fn test_concurrent_uploads_keep_single_document() {
        let temp = TempDir::new().unwrap();
        let (lectern, _) = setup(&temp);

        let mut handles = Vec::new();
        for i in 0..16 {
            let lectern = Arc::clone(&lectern);
            handles.push(tokio::spawn(async move {
                let content = format!("document {}", i).into_bytes();
                lectern
                    .upload(&format!("doc-{:02}.pdf", i), &content[..])
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let staged: Vec<_> = std::fs::read_dir(lectern.slot().dir())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(staged.len(), 1);
        assert!(lectern.current_document().await.is_ok());
    }

    #[tokio::test]
    async fn test_upload_waits_for_running_conversion() {
        let temp = TempDir::new().unwrap();
        let (lectern, pipeline) = setup(&temp);
        lectern.upload("first.pdf", &b"one"[..]).await.unwrap();
        pipeline.set_delay(Duration::from_millis(200)).await;

        let converting = {
            let lectern = Arc::clone(&lectern);
            tokio::spawn(async move { lectern.convert().await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        lectern.upload("second.pdf", &b"two"[..]).await.unwrap();

        let output = converting.await.unwrap().unwrap();
        assert_eq!(output["document"], "first.pdf");
        assert_eq!(
            lectern.current_document().await.unwrap().filename,
            "second.pdf"
        );
    }

    #[tokio::test]
    async fn test_from_config_applies_timeout() {
        let temp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.storage =
            StorageConfig::new(temp.path().join("uploads"), temp.path().join("output"));
        config.pipeline.timeout_secs = Some(1);

        let pipeline = Arc::new(MockPipeline::new(&config.storage.output_root));
        pipeline.set_delay(Duration::from_secs(10)).await;
        let lectern = Lectern::from_config(&config, pipeline);
        lectern.upload("book.pdf", &b"%PDF"[..]).await.unwrap();

        let err = lectern.convert().await.unwrap_err();
        assert!(matches!(err, ConvertError::Timeout { timeout_secs: 1 }));
    }
}

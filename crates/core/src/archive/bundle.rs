use std::io;
use std::path::Path;
use std::pin::Pin;
use std::task::{Context, Poll};
use tempfile::TempPath;
use tokio::fs::File;
use tokio::io::{AsyncRead, ReadBuf};

/// A finished zip bundle on disk, deleted on drop.
#[derive(Debug)]
pub struct Bundle {
    path: TempPath,
    size: u64,
    entries: usize,
}

impl Bundle {
    pub(crate) fn new(path: TempPath, size: u64, entries: usize) -> Self {
        Self {
            path,
            size,
            entries,
        }
    }

    /// Location of the temporary bundle.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size of the bundle in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Number of artifacts in the bundle.
    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Opens the bundle for streaming. The file is deleted once the reader is dropped.
    pub async fn into_reader(self) -> io::Result<BundleReader> {
        let file = File::open(&self.path).await?;
        Ok(BundleReader {
            file,
            _path: self.path,
        })
    }
}

/// Streams a [`Bundle`] and removes it when dropped.
#[derive(Debug)]
pub struct BundleReader {
    file: File,
    _path: TempPath,
}

impl AsyncRead for BundleReader {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().file).poll_read(cx, buf)
    }
}

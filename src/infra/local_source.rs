use crate::app::ports::{BulkSourcePort, DatasetSource};
use crate::error::{ReportError, Result};
use crate::pipeline::ingestion::{TransientArchive, TransientWriter};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;
use tracing::{info, instrument};

const COPY_BUFFER_BYTES: usize = 64 * 1024;

/// Serves archives from a local directory, for offline runs.
///
/// `<dir>/<archive name>` is copied into a transient file so the pipeline
/// can delete its copy without touching the original.
pub struct LocalArchiveSource {
    dir: PathBuf,
    download_dir: Option<PathBuf>,
}

impl LocalArchiveSource {
    pub fn new(dir: impl Into<PathBuf>, download_dir: Option<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            download_dir,
        }
    }
}

#[async_trait]
impl BulkSourcePort for LocalArchiveSource {
    #[instrument(skip(self, source), fields(dataset = source.dataset))]
    async fn fetch(&self, source: &DatasetSource) -> Result<TransientArchive> {
        let path = self.dir.join(source.archive_name());
        info!("📂 Reading {}", path.display());

        let mut input = tokio::fs::File::open(&path)
            .await
            .map_err(|source| ReportError::LocalArchive {
                path: path.clone(),
                source,
            })?;
        let mut writer = TransientWriter::create(source.dataset, self.download_dir.as_deref())?;
        let mut buf = vec![0u8; COPY_BUFFER_BYTES];
        loop {
            let n = input.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            writer.write_chunk(&buf[..n]).await?;
        }

        writer.finish().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_copies_archive_and_keeps_original() -> anyhow::Result<()> {
        let data = tempfile::tempdir()?;
        let scratch = tempfile::tempdir()?;
        std::fs::write(data.path().join("cm06.zip"), b"zip bytes")?;

        let source = LocalArchiveSource::new(data.path(), Some(scratch.path().to_path_buf()));
        let archive = source
            .fetch(&DatasetSource::new("committees", "https://example.org/2006/cm06.zip"))
            .await?;

        assert_eq!(std::fs::read(archive.path())?, b"zip bytes");
        assert_eq!(archive.bytes(), 9);
        drop(archive);

        assert!(data.path().join("cm06.zip").exists());
        assert_eq!(std::fs::read_dir(scratch.path())?.count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_archive_names_its_path() -> anyhow::Result<()> {
        let data = tempfile::tempdir()?;
        let source = LocalArchiveSource::new(data.path(), None);

        let err = source
            .fetch(&DatasetSource::new("committees", "cm06.zip"))
            .await
            .unwrap_err();
        match &err {
            ReportError::LocalArchive { path, source } => {
                assert_eq!(path, &data.path().join("cm06.zip"));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("cm06.zip"));
        Ok(())
    }
}

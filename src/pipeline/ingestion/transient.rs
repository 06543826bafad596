use sha2::{Digest, Sha256};
use std::path::Path;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::Result;

/// A downloaded archive living in a temporary file.
///
/// The file is removed when the handle is dropped, on success and failure
/// paths alike.
#[derive(Debug)]
pub struct TransientArchive {
    dataset: &'static str,
    file: NamedTempFile,
    bytes: u64,
    sha256: String,
}

impl TransientArchive {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    /// Hex SHA-256 of the archive bytes
    pub fn sha256(&self) -> &str {
        &self.sha256
    }
}

impl Drop for TransientArchive {
    fn drop(&mut self) {
        debug!(
            "{}: removing transient archive {}",
            self.dataset,
            self.file.path().display()
        );
    }
}

/// Streams bytes into a new transient archive, hashing as it goes.
///
/// Dropping the writer before [`TransientWriter::finish`] removes the
/// partial file.
pub struct TransientWriter {
    dataset: &'static str,
    temp: NamedTempFile,
    file: tokio::fs::File,
    hasher: Sha256,
    bytes: u64,
}

impl TransientWriter {
    pub fn create(dataset: &'static str, download_dir: Option<&Path>) -> Result<Self> {
        let prefix = format!("fec-{}-", dataset);
        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix).suffix(".zip");

        let temp = match download_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir)?;
                builder.tempfile_in(dir)?
            }
            None => builder.tempfile()?,
        };
        let file = tokio::fs::File::from_std(temp.reopen()?);

        Ok(Self {
            dataset,
            temp,
            file,
            hasher: Sha256::new(),
            bytes: 0,
        })
    }

    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<()> {
        self.hasher.update(chunk);
        self.file.write_all(chunk).await?;
        self.bytes += chunk.len() as u64;
        Ok(())
    }

    pub async fn finish(self) -> Result<TransientArchive> {
        let TransientWriter {
            dataset,
            temp,
            mut file,
            hasher,
            bytes,
        } = self;

        file.flush().await?;
        drop(file);

        Ok(TransientArchive {
            dataset,
            file: temp,
            bytes,
            sha256: hex::encode(hasher.finalize()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_archive_removed_on_drop() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;

        let mut writer = TransientWriter::create("committees", Some(dir.path()))?;
        writer.write_chunk(b"ab").await?;
        writer.write_chunk(b"c").await?;
        let archive = writer.finish().await?;

        let path = archive.path().to_path_buf();
        assert!(path.starts_with(dir.path()));
        assert_eq!(std::fs::read(&path)?, b"abc");
        assert_eq!(archive.bytes(), 3);
        assert_eq!(
            archive.sha256(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );

        drop(archive);
        assert!(!path.exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_unfinished_writer_leaves_nothing_behind() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;

        let mut writer = TransientWriter::create("contributions", Some(dir.path()))?;
        writer.write_chunk(b"partial").await?;
        drop(writer);

        assert_eq!(std::fs::read_dir(dir.path())?.count(), 0);
        Ok(())
    }
}

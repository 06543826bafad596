use crate::app::ports::{BulkSourcePort, DatasetSource};
use crate::error::{ReportError, Result};
use crate::pipeline::ingestion::{TransientArchive, TransientWriter};
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Downloads bulk archives over HTTP(S) into transient files
pub struct ReqwestBulkSource {
    client: reqwest::Client,
    download_dir: Option<PathBuf>,
}

impl ReqwestBulkSource {
    pub fn new(timeout: Duration, download_dir: Option<PathBuf>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("fec_report/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ReportError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            download_dir,
        })
    }
}

#[async_trait]
impl BulkSourcePort for ReqwestBulkSource {
    #[instrument(skip(self, source), fields(dataset = source.dataset, url = %source.url))]
    async fn fetch(&self, source: &DatasetSource) -> Result<TransientArchive> {
        let fetch_err = |e: reqwest::Error| ReportError::Fetch {
            url: source.url.clone(),
            source: e,
        };

        info!("📡 Downloading {}", source.url);
        let mut resp = self.client.get(&source.url).send().await.map_err(fetch_err)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ReportError::HttpStatus {
                url: source.url.clone(),
                status: status.as_u16(),
            });
        }
        if let Some(len) = resp.content_length() {
            debug!("content-length {}", len);
        }

        let mut writer = TransientWriter::create(source.dataset, self.download_dir.as_deref())?;
        while let Some(chunk) = resp.chunk().await.map_err(fetch_err)? {
            writer.write_chunk(&chunk).await?;
        }
        let archive = writer.finish().await?;

        info!(
            "✅ Downloaded {} bytes (sha256 {})",
            archive.bytes(),
            archive.sha256()
        );
        Ok(archive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answer a single request with `response`, returning the archive URL
    async fn serve_once(response: &'static [u8]) -> anyhow::Result<String> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let _ = socket.write_all(response).await;
            let _ = socket.shutdown().await;
        });
        Ok(format!("http://{}/2006/cm06.zip", addr))
    }

    fn source_in(dir: &std::path::Path) -> anyhow::Result<ReqwestBulkSource> {
        Ok(ReqwestBulkSource::new(
            Duration::from_secs(5),
            Some(dir.to_path_buf()),
        )?)
    }

    #[tokio::test]
    async fn test_streams_body_into_transient_archive() -> anyhow::Result<()> {
        let url = serve_once(b"HTTP/1.1 200 OK\r\nContent-Length: 3\r\nConnection: close\r\n\r\nabc").await?;
        let scratch = tempfile::tempdir()?;

        let archive = source_in(scratch.path())?
            .fetch(&DatasetSource::new("committees", url))
            .await?;

        assert_eq!(archive.bytes(), 3);
        assert_eq!(
            archive.sha256(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        drop(archive);
        assert_eq!(std::fs::read_dir(scratch.path())?.count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_not_found_is_http_status_with_url() -> anyhow::Result<()> {
        let url = serve_once(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n").await?;
        let scratch = tempfile::tempdir()?;

        let err = source_in(scratch.path())?
            .fetch(&DatasetSource::new("committees", url.clone()))
            .await
            .unwrap_err();

        match &err {
            ReportError::HttpStatus { url: failed, status } => {
                assert_eq!(failed, &url);
                assert_eq!(*status, 404);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains(&url));
        assert_eq!(std::fs::read_dir(scratch.path())?.count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_truncated_body_is_fetch_error_and_leaves_nothing() -> anyhow::Result<()> {
        let url = serve_once(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\nConnection: close\r\n\r\npartial").await?;
        let scratch = tempfile::tempdir()?;

        let err = source_in(scratch.path())?
            .fetch(&DatasetSource::new("committees", url.clone()))
            .await
            .unwrap_err();

        match &err {
            ReportError::Fetch { url: failed, .. } => assert_eq!(failed, &url),
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains(&url));
        assert_eq!(std::fs::read_dir(scratch.path())?.count(), 0);
        Ok(())
    }
}

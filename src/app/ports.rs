use async_trait::async_trait;

use crate::error::Result;
use crate::pipeline::ingestion::TransientArchive;

/// Where one bulk dataset comes from
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatasetSource {
    pub dataset: &'static str,
    pub url: String,
}

impl DatasetSource {
    pub fn new(dataset: &'static str, url: impl Into<String>) -> Self {
        Self {
            dataset,
            url: url.into(),
        }
    }

    /// File name of the archive, the last path segment of the URL
    pub fn archive_name(&self) -> &str {
        let path = self.url.split(['?', '#']).next().unwrap_or_default();
        path.rsplit('/').next().unwrap_or(path)
    }
}

// Ingest-side port: anything that can hand over a bulk archive
#[async_trait]
pub trait BulkSourcePort: Send + Sync {
    async fn fetch(&self, source: &DatasetSource) -> Result<TransientArchive>;
}

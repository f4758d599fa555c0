use crate::scrapers::traits::PageProvider;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::info;

/// Replays a page saved earlier, e.g. a debug dump from the browser source.
pub struct FilePageProvider {
    path: PathBuf,
}

impl FilePageProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PageProvider for FilePageProvider {
    async fn fetch_page(&self) -> Result<Option<String>> {
        info!("Reading listings page from {}", self.path.display());
        let html = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        Ok(Some(html))
    }

    fn source_name(&self) -> &'static str {
        "file"
    }
}

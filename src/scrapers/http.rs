use crate::scrapers::traits::PageProvider;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Fetches the listings page without rendering it.
///
/// Only useful when the listing grid is present in the server response;
/// lazily loaded entries are never seen.
pub struct HttpPageProvider {
    client: Client,
    url: String,
}

impl HttpPageProvider {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36")
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl PageProvider for HttpPageProvider {
    async fn fetch_page(&self) -> Result<Option<String>> {
        info!("Fetching listings page over HTTP");
        debug!("Fetching URL: {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .context("Failed to fetch listings page")?;

        if !response.status().is_success() {
            warn!("Listings page returned status: {}", response.status());
            anyhow::bail!("Failed to fetch listings page: {}", response.status());
        }

        let html = response.text().await.context("Failed to read response body")?;
        debug!("Downloaded {} bytes of HTML", html.len());

        Ok(Some(html))
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}

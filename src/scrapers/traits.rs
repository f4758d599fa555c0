use anyhow::Result;
use async_trait::async_trait;

/// Supplies the raw listings document for one run.
///
/// Parsing never depends on how the page was obtained, so a headless browser,
/// a plain HTTP fetch or a saved file are interchangeable.
#[async_trait]
pub trait PageProvider: Send + Sync {
    /// Fetch the page. `Ok(None)` means no listings showed up in time,
    /// which ends the run quietly.
    async fn fetch_page(&self) -> Result<Option<String>>;

    /// Get the name of the page source
    fn source_name(&self) -> &'static str;
}

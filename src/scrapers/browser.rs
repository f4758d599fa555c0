use crate::config::BrowserConfig;
use crate::scrapers::traits::PageProvider;
use anyhow::{Context, Result};
use async_trait::async_trait;
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::path::{Path, PathBuf};
use std::thread;
use tracing::{debug, info, warn};

/// Renders the listings page in headless Chrome, scrolling until the lazily
/// loaded grid stops growing.
pub struct BrowserPageProvider {
    browser: Browser,
    url: String,
    listing_css: String,
    config: BrowserConfig,
    debug_dir: Option<PathBuf>,
}

impl BrowserPageProvider {
    /// Launch a browser for `url`; `listing_css` selects one listing anchor
    pub fn new(
        url: impl Into<String>,
        listing_css: impl Into<String>,
        config: BrowserConfig,
        debug_dir: Option<PathBuf>,
    ) -> Result<Self> {
        info!("Launching headless Chrome...");

        let options = LaunchOptions::default_builder()
            .headless(config.headless)
            .sandbox(false)
            .path(config.chrome_path.clone())
            .build()
            .context("Failed to build launch options")?;

        let browser = Browser::new(options).context("Failed to launch Chrome browser")?;

        Ok(Self {
            browser,
            url: url.into(),
            listing_css: listing_css.into(),
            config,
            debug_dir,
        })
    }

    fn render(&self) -> Result<Option<String>> {
        info!("Opening listings page...");
        let tab = self.browser.new_tab()?;

        tab.navigate_to(&self.url)?;
        tab.wait_until_navigated()?;

        if let Err(e) =
            tab.wait_for_element_with_custom_timeout(&self.listing_css, self.config.initial_wait)
        {
            info!("No listings appeared within {:?}", self.config.initial_wait);
            debug!("Wait for listings failed: {}", e);
            let _ = tab.close(true);
            return Ok(None);
        }

        self.scroll_until_stable(&tab)?;

        let html_result = tab.evaluate("document.documentElement.outerHTML", false)?;
        let html = html_result
            .value
            .as_ref()
            .and_then(|value| value.as_str())
            .map(str::to_string);

        if let Some(html) = &html {
            if let Some(dir) = &self.debug_dir {
                self.dump_debug(&tab, dir, html)?;
            }
        } else {
            warn!("Could not get HTML from page");
        }

        let _ = tab.close(true);
        Ok(html)
    }

    /// Scroll in fixed steps until the listing count is unchanged for
    /// `stable_checks` consecutive checks.
    fn scroll_until_stable(&self, tab: &Tab) -> Result<()> {
        info!("Scrolling to load all listings...");
        let scroll = format!("window.scrollBy(0, {});", self.config.scroll_step);

        let mut last_count = 0;
        let mut same_count = 0;
        let mut scrolls = 0;

        while same_count < self.config.stable_checks {
            if scrolls >= self.config.max_scrolls {
                warn!("Stopped scrolling after {} steps", scrolls);
                break;
            }
            scrolls += 1;

            tab.evaluate(&scroll, false)?;
            thread::sleep(self.config.settle_delay);

            let count = self.visible_listings(tab)?;
            debug!("Visible listings: {}", count);

            if count == last_count {
                same_count += 1;
            } else {
                same_count = 0;
                last_count = count;
            }
        }

        info!("Scrolling finished with {} visible listings", last_count);
        Ok(())
    }

    fn visible_listings(&self, tab: &Tab) -> Result<u64> {
        let selector = serde_json::to_string(&self.listing_css)?;
        let result = tab.evaluate(
            &format!("document.querySelectorAll({}).length", selector),
            false,
        )?;
        Ok(result.value.and_then(|v| v.as_u64()).unwrap_or(0))
    }

    fn dump_debug(&self, tab: &Tab, dir: &Path, html: &str) -> Result<()> {
        std::fs::create_dir_all(dir)?;

        let html_path = dir.join("relocations_page.html");
        std::fs::write(&html_path, html)?;
        info!("Saved page HTML to {} ({} bytes)", html_path.display(), html.len());

        let screenshot = tab.capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)?;
        let screenshot_path = dir.join("relocations_screenshot.png");
        std::fs::write(&screenshot_path, screenshot)?;
        info!("Saved screenshot to {}", screenshot_path.display());

        Ok(())
    }
}

#[async_trait]
impl PageProvider for BrowserPageProvider {
    async fn fetch_page(&self) -> Result<Option<String>> {
        // headless_chrome blocks on every call
        tokio::task::block_in_place(|| self.render())
    }

    fn source_name(&self) -> &'static str {
        "browser"
    }
}

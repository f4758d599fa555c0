use crate::error::ConfigError;
use crate::scrapers::NightsRule;
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Run configuration, built once at startup and handed to the pipeline.
#[derive(Debug, Clone)]
pub struct Config {
    /// Scheme and host prepended to listing paths, e.g. `https://www.imoova.com`
    pub site_origin: String,
    /// Page holding the listing grid
    pub listing_url: String,
    /// Path prefix shared by every listing link, e.g. `/en/relocations/`
    pub listing_prefix: String,
    pub store_path: PathBuf,
    /// Offers need strictly more nights than this to be reported
    pub nights_threshold: u32,
    pub nights_rule: NightsRule,
    pub browser: BrowserConfig,
    /// Where to dump the rendered page, if anywhere
    pub debug_dir: Option<PathBuf>,
    /// Detect and report only; never touch the store or send mail
    pub dry_run: bool,
}

/// Wait strategy for the headless browser.
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    pub headless: bool,
    pub chrome_path: Option<PathBuf>,
    /// How long to wait for the first listing to appear
    pub initial_wait: Duration,
    /// Pixels scrolled per step
    pub scroll_step: u32,
    pub settle_delay: Duration,
    /// Consecutive unchanged counts before the list is considered complete
    pub stable_checks: u32,
    pub max_scrolls: u32,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            chrome_path: None,
            initial_wait: Duration::from_secs(20),
            scroll_step: 1300,
            settle_delay: Duration::from_secs(2),
            stable_checks: 10,
            max_scrolls: 500,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_origin: "https://www.imoova.com".to_string(),
            listing_url: "https://www.imoova.com/en/relocations?region=EU".to_string(),
            listing_prefix: "/en/relocations/".to_string(),
            store_path: PathBuf::from("offers.json"),
            nights_threshold: 3,
            nights_rule: NightsRule::default(),
            browser: BrowserConfig::default(),
            debug_dir: None,
            dry_run: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        let _ = dotenv();

        let defaults = Self::default();
        let browser_defaults = defaults.browser;

        Ok(Self {
            site_origin: env_or("RELOCATION_SITE_ORIGIN", defaults.site_origin),
            listing_url: env_or("RELOCATION_LISTING_URL", defaults.listing_url),
            listing_prefix: env_or("RELOCATION_LISTING_PREFIX", defaults.listing_prefix),
            store_path: env::var("OFFERS_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.store_path),
            nights_threshold: env_parse("NIGHTS_THRESHOLD")?.unwrap_or(defaults.nights_threshold),
            nights_rule: env_parse("NIGHTS_RULE")?.unwrap_or(defaults.nights_rule),
            browser: BrowserConfig {
                headless: env_parse("BROWSER_HEADLESS")?.unwrap_or(browser_defaults.headless),
                chrome_path: env::var("CHROME_PATH").ok().map(PathBuf::from),
                ..browser_defaults
            },
            debug_dir: env::var("DEBUG_DIR").ok().map(PathBuf::from),
            dry_run: false,
        })
    }
}

/// SMTP delivery settings. Only loaded when mail is actually going to be sent.
#[derive(Clone)]
pub struct SmtpConfig {
    pub server: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub to: String,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("to", &self.to)
            .finish()
    }
}

impl SmtpConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenv();

        let user = env::var("SMTP_USER").map_err(|_| ConfigError::Missing("SMTP_USER"))?;
        let password =
            env::var("SMTP_PASSWORD").map_err(|_| ConfigError::Missing("SMTP_PASSWORD"))?;

        Ok(Self {
            server: env_or("SMTP_SERVER", "smtp.gmail.com".to_string()),
            port: env_parse("SMTP_PORT")?.unwrap_or(587),
            to: env::var("SMTP_TO").unwrap_or_else(|_| user.clone()),
            user,
            password,
        })
    }
}

fn env_or(key: &str, default: String) -> String {
    env::var(key).unwrap_or(default)
}

fn env_parse<T: FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(None),
    }
}

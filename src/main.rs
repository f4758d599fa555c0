mod config;
mod detector;
mod error;
mod models;
mod notifier;
mod pipeline;
mod scrapers;
mod store;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use config::{Config, SmtpConfig};
use notifier::{summary_line, LogNotifier, Notifier, SmtpNotifier};
use pipeline::RunOutcome;
use scrapers::{
    BrowserPageProvider, FilePageProvider, HttpPageProvider, NightsRule, OfferParser, PageProvider,
};
use std::path::PathBuf;
use store::OfferStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Source {
    /// Render the page in headless Chrome
    Browser,
    /// Plain HTTP fetch, no JavaScript
    Http,
    /// Read a saved page from --html
    File,
}

/// Watch the relocation listings and mail new long offers
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    #[arg(long, value_enum, default_value_t = Source::Browser)]
    source: Source,

    /// Saved listings page, required with --source file
    #[arg(long, required_if_eq("source", "file"))]
    html: Option<PathBuf>,

    /// Offer store, overrides OFFERS_FILE
    #[arg(long)]
    store: Option<PathBuf>,

    /// Offers need more nights than this, overrides NIGHTS_THRESHOLD
    #[arg(long)]
    nights_threshold: Option<u32>,

    /// "first" or "sum", overrides NIGHTS_RULE
    #[arg(long)]
    nights_rule: Option<NightsRule>,

    /// Report new offers in the log only; no store write, no email
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(path) = cli.store {
        config.store_path = path;
    }
    if let Some(threshold) = cli.nights_threshold {
        config.nights_threshold = threshold;
    }
    if let Some(rule) = cli.nights_rule {
        config.nights_rule = rule;
    }
    config.dry_run = cli.dry_run;

    info!("🚐 Relocation Alert");
    info!(
        "Offers need more than {} nights ({} rule)",
        config.nights_threshold, config.nights_rule
    );

    // Credentials are checked before any scraping happens
    let notifier: Box<dyn Notifier> = if config.dry_run {
        Box::new(LogNotifier::new(config.nights_threshold))
    } else {
        let smtp = SmtpConfig::from_env()?;
        Box::new(SmtpNotifier::new(&smtp, config.nights_threshold).context("Invalid SMTP settings")?)
    };

    let provider: Box<dyn PageProvider> = match cli.source {
        Source::Browser => {
            let parser = OfferParser::new(&config)?;
            Box::new(BrowserPageProvider::new(
                config.listing_url.clone(),
                parser.listing_css(),
                config.browser.clone(),
                config.debug_dir.clone(),
            )?)
        }
        Source::Http => Box::new(HttpPageProvider::new(config.listing_url.clone())?),
        Source::File => {
            let path = cli.html.context("--html is required with --source file")?;
            Box::new(FilePageProvider::new(path))
        }
    };

    let store = OfferStore::new(config.store_path.clone());
    let outcome = pipeline::run(&config, provider.as_ref(), &store, notifier.as_ref()).await?;

    match outcome {
        RunOutcome::NoListings => info!("Run finished without listings"),
        RunOutcome::NothingNew { parsed } => {
            info!("Run finished: {} offers checked, none new", parsed)
        }
        RunOutcome::Notified { offers, delivered } => {
            info!("\n✅ {} new offers\n", offers.len());
            for offer in &offers {
                println!("{}", summary_line(offer));
            }
            if !delivered {
                info!("Notification was not delivered, offers are stored anyway");
            }
        }
    }

    Ok(())
}

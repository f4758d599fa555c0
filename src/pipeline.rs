use crate::config::Config;
use crate::detector::detect_new;
use crate::models::Offer;
use crate::notifier::Notifier;
use crate::scrapers::{OfferParser, PageProvider};
use crate::store::OfferStore;
use anyhow::{Context, Result};
use tracing::{error, info};

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The page had no listings, nothing was touched
    NoListings,
    /// Listings were parsed but none were new and qualifying
    NothingNew { parsed: usize },
    /// New qualifying offers were found and stored (unless dry run)
    Notified { offers: Vec<Offer>, delivered: bool },
}

/// One fetch, parse, diff, persist and notify pass.
///
/// Notification failures are logged and reported through `delivered`; the
/// store has already been written by then.
pub async fn run(
    config: &Config,
    provider: &dyn PageProvider,
    store: &OfferStore,
    notifier: &dyn Notifier,
) -> Result<RunOutcome> {
    let parser = OfferParser::new(config).context("Invalid listing configuration")?;

    info!("Fetching listings from {} source", provider.source_name());
    let Some(html) = provider.fetch_page().await? else {
        info!("No listings available, nothing to do");
        return Ok(RunOutcome::NoListings);
    };

    let offers = parser.parse(&html);
    if offers.is_empty() {
        info!("No offers found on the page, nothing to do");
        return Ok(RunOutcome::NoListings);
    }

    let previous = store.load().await?;
    let new_offers = detect_new(&offers, &previous, config.nights_threshold);

    if new_offers.is_empty() {
        info!(
            "No new offers with more than {} nights",
            config.nights_threshold
        );
        return Ok(RunOutcome::NothingNew {
            parsed: offers.len(),
        });
    }

    info!("✅ Detected {} new offers", new_offers.len());

    if config.dry_run {
        info!("Dry run, leaving {} untouched", store.path().display());
    } else {
        let mut all = previous;
        all.extend(new_offers.iter().cloned());
        store.save(&all).await?;
    }

    let delivered = match notifier.notify(&new_offers).await {
        Ok(()) => true,
        Err(e) => {
            error!("Failed to send notification: {:#}", anyhow::Error::from(e));
            false
        }
    };

    Ok(RunOutcome::Notified {
        offers: new_offers,
        delivered,
    })
}

use crate::config::Config;
use crate::error::ConfigError;
use crate::models::Offer;
use crate::scrapers::nights::{parse_nights, NightsRule};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

const E: &str = "Invalid selector";
static HEADING: Lazy<Selector> = Lazy::new(|| Selector::parse("h3").expect(E));
static DATE: Lazy<Selector> = Lazy::new(|| Selector::parse("time").expect(E));
static SPAN: Lazy<Selector> = Lazy::new(|| Selector::parse("span").expect(E));
// A number followed by a whole duration word, or an open-ended "21+"
static DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\d.*\b(?:nights?|noches?|days?|d[ií]as?)\b|\d+\+")
        .expect("Invalid duration pattern")
});

const ROUTE_SEPARATOR: char = '→';

/// Turns the rendered relocations page into offer records.
#[derive(Debug, Clone)]
pub struct OfferParser {
    listing_css: String,
    listing: Selector,
    id_pattern: Regex,
    site_origin: String,
    nights_rule: NightsRule,
}

impl OfferParser {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let listing_css = listing_css(&config.listing_prefix);
        let listing =
            Selector::parse(&listing_css).map_err(|_| ConfigError::Selector(listing_css.clone()))?;
        let id_pattern = Regex::new(&format!(
            r"^{}(\d+)",
            regex::escape(&config.listing_prefix)
        ))?;

        Ok(Self {
            listing_css,
            listing,
            id_pattern,
            site_origin: config.site_origin.trim_end_matches('/').to_string(),
            nights_rule: config.nights_rule,
        })
    }

    /// CSS selector matching one listing anchor
    pub fn listing_css(&self) -> &str {
        &self.listing_css
    }

    /// Extract every offer from `html`, in document order.
    ///
    /// Anchors without an `href` or without a numeric id are dropped. Every
    /// other missing piece just leaves the matching field empty.
    pub fn parse(&self, html: &str) -> Vec<Offer> {
        let document = Html::parse_document(html);
        let anchors: Vec<_> = document.select(&self.listing).collect();
        info!("Found {} listing elements", anchors.len());

        let offers: Vec<Offer> = anchors
            .into_iter()
            .filter_map(|anchor| self.parse_anchor(anchor))
            .collect();

        for offer in &offers {
            debug!(
                "{} → {} | nights: {:?} | dates: {:?}",
                offer.origin.as_deref().unwrap_or("?"),
                offer.destination.as_deref().unwrap_or("?"),
                offer.nights,
                offer.dates
            );
        }

        offers
    }

    fn parse_anchor(&self, anchor: ElementRef) -> Option<Offer> {
        let Some(href) = anchor.value().attr("href") else {
            debug!("Skipping listing without href");
            return None;
        };

        let Some(id) = self
            .id_pattern
            .captures(href)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
        else {
            debug!("Skipping listing without numeric id: {}", href);
            return None;
        };

        let (origin, destination) = anchor
            .select(&HEADING)
            .next()
            .map(|h3| split_route(&stripped_text(h3)))
            .unwrap_or((None, None));

        let dates: Vec<String> = anchor.select(&DATE).map(stripped_text).collect();
        let dates = (!dates.is_empty()).then(|| dates.join(" - "));

        let nights = anchor
            .select(&SPAN)
            .map(stripped_text)
            .filter(|label| DURATION.is_match(label))
            .find_map(|label| parse_nights(&label, self.nights_rule));

        Some(Offer {
            link: format!("{}{}", self.site_origin, href),
            id,
            origin,
            destination,
            nights,
            dates,
        })
    }
}

fn listing_css(prefix: &str) -> String {
    format!(r#"ul.grid li a[href^="{}"]"#, prefix)
}

/// Text of every descendant text node, each trimmed, concatenated.
fn stripped_text(element: ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Split `"Madrid → Berlin"` into origin and destination.
fn split_route(heading: &str) -> (Option<String>, Option<String>) {
    let parts: Vec<&str> = heading.split(ROUTE_SEPARATOR).map(str::trim).collect();
    match parts.as_slice() {
        [origin, destination] => (non_empty(origin), non_empty(destination)),
        _ => (None, None),
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

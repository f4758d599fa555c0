use serde::{Deserialize, Serialize};

/// One relocation listing scraped from the offers page.
///
/// Identity is the `id` alone: two offers with the same id are the same
/// offer, whatever their other fields say.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Offer {
    pub id: String,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub nights: Option<u32>,
    #[serde(default)]
    pub dates: Option<String>,
    pub link: String,
}

impl Offer {
    /// True when the offer has a night count strictly above `threshold`.
    pub fn qualifies(&self, threshold: u32) -> bool {
        matches!(self.nights, Some(nights) if nights > threshold)
    }
}

use crate::error::StoreError;
use crate::models::Offer;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// JSON file holding every offer reported so far.
///
/// There is no locking: two overlapping runs would each rewrite the file and
/// the later one wins.
#[derive(Debug, Clone)]
pub struct OfferStore {
    path: PathBuf,
}

impl OfferStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load previously stored offers.
    ///
    /// A missing file or one that does not decode as an offer list counts as
    /// an empty store. Any other read failure is an error, so a store that
    /// merely could not be read is never overwritten with a fresh list.
    pub async fn load(&self) -> Result<Vec<Offer>, StoreError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No offer store at {}, starting empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                warn!(
                    "Offer store {} is not valid UTF-8, starting empty",
                    self.path.display()
                );
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        match serde_json::from_str::<Vec<Offer>>(&raw) {
            Ok(offers) => {
                debug!("Loaded {} stored offers", offers.len());
                Ok(offers)
            }
            Err(e) => {
                warn!(
                    "Offer store {} is not valid JSON ({}), starting empty",
                    self.path.display(),
                    e
                );
                Ok(Vec::new())
            }
        }
    }

    /// Replace the store contents with `offers`.
    ///
    /// Written to a sibling temp file first and renamed into place.
    pub async fn save(&self, offers: &[Offer]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(offers)?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, json)
            .await
            .map_err(|source| StoreError::Io {
                path: tmp.clone(),
                source,
            })?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })?;

        info!("💾 Saved {} offers to {}", offers.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn offer(id: &str, nights: Option<u32>) -> Offer {
        Offer {
            id: id.to_string(),
            origin: Some("Madrid".to_string()),
            destination: Some("Berlin".to_string()),
            nights,
            dates: Some("12 Jun - 19 Jun".to_string()),
            link: format!("https://www.imoova.com/en/relocations/{}", id),
        }
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = OfferStore::new(dir.path().join("offers.json"));
        assert!(store.load().await.expect("load").is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("offers.json");
        std::fs::write(&path, "[{\"id\": \"1\", ").expect("write");

        let store = OfferStore::new(&path);
        assert!(store.load().await.expect("load").is_empty());

        std::fs::write(&path, r#"{"id": "1"}"#).expect("write");
        assert!(store.load().await.expect("load").is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load_keeps_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = OfferStore::new(dir.path().join("offers.json"));
        let offers = vec![offer("3", Some(6)), offer("1", None)];

        store.save(&offers).await.expect("save");

        assert_eq!(store.load().await.expect("load"), offers);
        assert!(!dir.path().join("offers.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_save_overwrites_and_pretty_prints() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = OfferStore::new(dir.path().join("offers.json"));

        store.save(&[offer("1", Some(5)), offer("2", Some(9))]).await.expect("save");
        store.save(&[offer("7", Some(4))]).await.expect("save");

        let raw = std::fs::read_to_string(store.path()).expect("read");
        assert!(raw.contains("\n  {"));
        assert_eq!(store.load().await.expect("load"), vec![offer("7", Some(4))]);
    }

    #[tokio::test]
    async fn test_invalid_utf8_loads_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("offers.json");
        std::fs::write(&path, [0xff, 0xfe, 0x5b]).expect("write");

        let store = OfferStore::new(&path);
        assert!(store.load().await.expect("load").is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_store_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("offers.json");
        std::fs::create_dir(&path).expect("mkdir");

        let store = OfferStore::new(&path);
        assert!(matches!(store.load().await, Err(StoreError::Io { .. })));
    }

    #[tokio::test]
    async fn test_save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = OfferStore::new(dir.path().join("nope").join("offers.json"));
        let result = store.save(&[offer("1", Some(5))]).await;
        assert!(matches!(result, Err(StoreError::Io { .. })));
    }
}

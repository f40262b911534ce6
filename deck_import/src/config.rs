use mtg_common::scryfall::SCRYFALL_API_URL;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::cache::CardCache;

/// Pacing and collaborator settings for an import
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Entries resolved per batch
    pub batch_size: usize,
    /// Pause between two resolutions inside a batch
    pub card_delay_ms: u64,
    /// Pause between two batches
    pub batch_delay_ms: u64,
    pub api_base_url: String,
    /// Card cache file; `None` keeps the cache in memory only
    pub cache_path: Option<PathBuf>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            card_delay_ms: 100,
            batch_delay_ms: 1000,
            api_base_url: SCRYFALL_API_URL.to_string(),
            cache_path: Some(CardCache::default_path()),
        }
    }
}

impl ImportConfig {
    /// No pauses and no persistence, for tests and local databases
    pub fn unpaced() -> Self {
        Self {
            card_delay_ms: 0,
            batch_delay_ms: 0,
            cache_path: None,
            ..Self::default()
        }
    }

    pub fn card_delay(&self) -> Duration {
        Duration::from_millis(self.card_delay_ms)
    }

    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ImportConfig::default();
        assert_eq!(config.batch_size, 10);
        assert_eq!(config.card_delay(), Duration::from_millis(100));
        assert_eq!(config.batch_delay(), Duration::from_secs(1));
        assert_eq!(config.api_base_url, "https://api.scryfall.com");
        assert!(config.cache_path.unwrap().ends_with("deck_import/card_cache.json"));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: ImportConfig =
            serde_json::from_str(r#"{"batch_size": 5, "cache_path": null}"#).unwrap();

        assert_eq!(config.batch_size, 5);
        assert_eq!(config.card_delay_ms, 100);
        assert!(config.cache_path.is_none());
    }
}

use crate::error::CacheError;
use mtg_common::CardRecord;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Name → card cache shared by every import in the process.
///
/// Keys are lower-cased canonical input names, so a corrected typo maps to
/// the card it resolved to. Entries are never replaced or evicted: the first
/// write for a key wins and later writes are no-ops.
#[derive(Debug, Default)]
pub struct CardCache {
    cards: RwLock<HashMap<String, CardRecord>>,
}

impl CardCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default on-disk location of the cache file
    pub fn default_path() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("deck_import")
            .join("card_cache.json")
    }

    /// Load cache from disk, or create empty if it doesn't exist or can't be read
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match serde_json::from_str::<HashMap<String, CardRecord>>(&content) {
                    Ok(cards) => {
                        log::info!("Loaded card cache with {} entries", cards.len());
                        return Self {
                            cards: RwLock::new(cards),
                        };
                    }
                    Err(e) => {
                        log::warn!("Failed to parse cache file, starting fresh: {}", e);
                    }
                },
                Err(e) => {
                    log::warn!("Failed to read cache file, starting fresh: {}", e);
                }
            }
        }
        log::info!("Starting with empty card cache");
        Self::default()
    }

    /// Save cache to disk
    pub fn save(&self, path: &Path) -> Result<(), CacheError> {
        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = {
            let cards = self.cards.read().map_err(|_| CacheError::Poisoned)?;
            serde_json::to_string_pretty(&*cards)?
        };
        std::fs::write(path, content)?;

        log::debug!("Saved card cache with {} entries", self.len());
        Ok(())
    }

    /// Get a card from cache
    pub fn get(&self, key: &str) -> Option<CardRecord> {
        self.cards.read().ok()?.get(key).cloned()
    }

    /// Insert a card under `key` unless the key is already present
    pub fn put(&self, key: &str, card: &CardRecord) {
        if let Ok(mut cards) = self.cards.write() {
            cards
                .entry(key.to_string())
                .or_insert_with(|| card.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.cards.read().map(|cards| cards.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

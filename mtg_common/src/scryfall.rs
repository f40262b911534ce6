//! Scryfall card model and search client
//!
//! Uses async reqwest for non-blocking HTTP requests.

use crate::error::{ScryfallError, ScryfallResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Production Scryfall API endpoint
pub const SCRYFALL_API_URL: &str = "https://api.scryfall.com";

const USER_AGENT: &str = "MTG-DeckImport/1.0";

/// A colour of mana, as it appears in Scryfall's `color_identity`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Color {
    #[serde(rename = "W")]
    White,
    #[serde(rename = "U")]
    Blue,
    #[serde(rename = "B")]
    Black,
    #[serde(rename = "R")]
    Red,
    #[serde(rename = "G")]
    Green,
}

/// Authoritative card data as returned by Scryfall
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CardRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub type_line: Option<String>,
    #[serde(default)]
    pub oracle_text: Option<String>,
    #[serde(default)]
    pub color_identity: Vec<Color>,
    #[serde(default)]
    pub image_uris: Option<ImageUris>,
    /// For double-faced cards, images and rules text are in card_faces
    #[serde(default)]
    pub card_faces: Option<Vec<CardFace>>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ImageUris {
    pub small: Option<String>,
    pub normal: Option<String>,
    pub large: Option<String>,
    #[serde(default)]
    pub art_crop: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CardFace {
    pub name: String,
    #[serde(default)]
    pub image_uris: Option<ImageUris>,
    #[serde(default)]
    pub type_line: Option<String>,
    #[serde(default)]
    pub oracle_text: Option<String>,
}

impl CardRecord {
    /// Get the primary image URL (normal size)
    pub fn image_url(&self) -> Option<&str> {
        // Try direct image_uris first
        if let Some(ref uris) = self.image_uris {
            return uris.normal.as_deref();
        }
        // For double-faced cards, get front face image
        self.card_faces
            .as_ref()
            .and_then(|faces| faces.first())
            .and_then(|face| face.image_uris.as_ref())
            .and_then(|uris| uris.normal.as_deref())
    }

    /// Type line of the front face ("Legendary Creature — Human Warrior")
    pub fn front_type_line(&self) -> &str {
        if let Some(type_line) = self.type_line.as_deref() {
            return type_line.split(" // ").next().unwrap_or(type_line);
        }
        self.card_faces
            .as_ref()
            .and_then(|faces| faces.first())
            .and_then(|face| face.type_line.as_deref())
            .unwrap_or("")
    }

    /// Rules text of every face, joined by newlines
    pub fn full_oracle_text(&self) -> String {
        if let Some(text) = self.oracle_text.as_deref() {
            return text.to_string();
        }
        self.card_faces
            .iter()
            .flatten()
            .filter_map(|face| face.oracle_text.as_deref())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Name of the front face ("Delver of Secrets" for "Delver of Secrets // Insectile Aberration")
    pub fn front_face_name(&self) -> &str {
        self.name.split(" // ").next().unwrap_or(&self.name)
    }
}

/// External card database consumed read-only by the importer
#[async_trait]
pub trait CardDatabase: Send + Sync {
    /// Cards whose name equals `name` exactly (case-insensitive)
    async fn search_exact(&self, name: &str) -> ScryfallResult<Vec<CardRecord>>;

    /// Free-text name search, results in the service's relevance order
    async fn search(&self, query: &str) -> ScryfallResult<Vec<CardRecord>>;
}

/// Scryfall list envelope
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<CardRecord>,
}

/// Scryfall API error response
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    code: String,
    details: String,
}

/// HTTP client for the Scryfall search endpoint
#[derive(Debug, Clone)]
pub struct ScryfallClient {
    client: reqwest::Client,
    base_url: String,
}

impl Default for ScryfallClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ScryfallClient {
    /// Client for the production API
    pub fn new() -> Self {
        Self::with_base_url(SCRYFALL_API_URL)
    }

    /// Client for an alternative base URL (mirrors, test servers)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_list(&self, query: &str) -> ScryfallResult<Vec<CardRecord>> {
        let url = format!(
            "{}/cards/search?q={}",
            self.base_url,
            urlencoding::encode(query)
        );

        log::debug!("Searching Scryfall: {}", query);

        let response = self
            .client
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let body = response.text().await?;
            let list: SearchResponse = serde_json::from_str(&body)?;
            return Ok(list.data);
        }

        // Scryfall answers an empty search with 404 not_found
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }

        match response.json::<ErrorResponse>().await {
            Ok(error) => Err(ScryfallError::ApiResponse {
                code: error.code,
                details: error.details,
            }),
            Err(_) => Err(ScryfallError::HttpStatus(status)),
        }
    }
}

#[async_trait]
impl CardDatabase for ScryfallClient {
    async fn search_exact(&self, name: &str) -> ScryfallResult<Vec<CardRecord>> {
        let query = format!("!\"{}\"", name.replace('"', ""));
        self.fetch_list(&query).await
    }

    async fn search(&self, query: &str) -> ScryfallResult<Vec<CardRecord>> {
        self.fetch_list(query).await
    }
}

#[cfg(test)]
#[path = "scryfall_tests.rs"]
mod tests;

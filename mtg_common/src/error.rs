//! Error types for Scryfall access

use thiserror::Error;

/// Unified error type for card database lookups
#[derive(Debug, Error)]
pub enum ScryfallError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Failed to parse JSON response
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// API returned an error response
    #[error("{code}: {details}")]
    ApiResponse { code: String, details: String },
    /// HTTP error status code without a readable error body
    #[error("HTTP error: {0}")]
    HttpStatus(reqwest::StatusCode),
}

/// Result alias for card database operations
pub type ScryfallResult<T> = Result<T, ScryfallError>;

//! Error types for deck import

use crate::models::FormatTag;
use thiserror::Error;

/// Structural failure of a dialect parser
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// Non-blank input in which no card line or commander was recognised
    #[error("No card lines recognised in {format} deck list")]
    NoCardLines { format: FormatTag },
}

/// Fatal import failure; per-card problems never surface here
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Deck list is empty")]
    EmptyInput,
    #[error("Failed to parse deck list as {format}: {source}")]
    Parse {
        format: FormatTag,
        #[source]
        source: ParseError,
    },
}

/// Persistence failure of the on-disk card cache
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Cache lock poisoned")]
    Poisoned,
}

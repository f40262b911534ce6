pub mod cache;
pub mod canonicalize;
pub mod commander;
pub mod config;
pub mod error;
pub mod format_detector;
pub mod importer;
pub mod matching;
pub mod models;
pub mod orchestrator;
pub mod parsers;
pub mod progress;
pub mod resolver;
pub mod validator;

#[cfg(test)]
mod test_support;

// Re-export commonly used items
pub use cache::CardCache;
pub use canonicalize::canonicalize;
pub use commander::{detect_commander, CommanderCandidate, CommanderPick};
pub use config::ImportConfig;
pub use error::{CacheError, ImportError, ParseError};
pub use format_detector::{detect_dialect, detect_format, Dialect};
pub use importer::DeckImporter;
pub use models::{
    CardEntry, DeckCard, DeckExport, FormatTag, ImportResult, ImportStats, ParsedDeck,
    ResolutionOutcome, ResolutionStep, UnresolvedCard,
};
pub use orchestrator::BatchOrchestrator;
pub use progress::{ImportStage, ProgressEvent, ProgressSink};
pub use resolver::{CardResolver, Resolution};
pub use validator::{validate, ValidationReport};

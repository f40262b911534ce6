//! End-to-end deck import.
//!
//! raw text → dialect detection → dialect parser → paced resolution →
//! fallback commander detection → [`ImportResult`]. Per-card failures are
//! collected in the result; only empty input and a list with no card lines
//! at all are returned as errors.

use log::{debug, info, warn};
use mtg_common::{CardDatabase, CardRecord};
use std::sync::Arc;

use crate::cache::CardCache;
use crate::commander::{detect_commander, is_commander_eligible, remove_commanders, CommanderCandidate};
use crate::config::ImportConfig;
use crate::error::{ImportError, ParseError};
use crate::format_detector::detect_dialect;
use crate::models::{
    CardEntry, DeckCard, FormatTag, ImportResult, ParsedDeck, ResolutionOutcome, ResolutionStep,
};
use crate::orchestrator::BatchOrchestrator;
use crate::parsers;
use crate::progress::{ProgressEvent, ProgressSink};
use crate::resolver::CardResolver;

/// A resolved main-deck line, still carrying its dialect marker
struct ResolvedLine {
    record: CardRecord,
    quantity: u32,
    explicit_marker: bool,
    /// Index of the line in the parsed entries
    source: usize,
}

pub struct DeckImporter<D> {
    resolver: CardResolver<D>,
    orchestrator: BatchOrchestrator,
}

impl<D: CardDatabase> DeckImporter<D> {
    pub fn new(database: D, cache: Arc<CardCache>, config: &ImportConfig) -> Self {
        Self {
            resolver: CardResolver::new(database, cache),
            orchestrator: BatchOrchestrator::from_config(config),
        }
    }

    pub fn resolver(&self) -> &CardResolver<D> {
        &self.resolver
    }

    /// Import a deck list, sniffing its dialect
    pub async fn import(
        &self,
        text: &str,
        progress: &ProgressSink,
    ) -> Result<ImportResult, ImportError> {
        progress.emit(ProgressEvent::parsing());
        let text = non_empty(text)?;

        let dialect = detect_dialect(text);
        info!("Detected {} deck list ({})", dialect.tag, dialect.fingerprint);
        let deck = (dialect.parse)(text);
        self.finish_import(deck, progress).await
    }

    /// Import a deck list as `format`, skipping detection
    pub async fn import_as(
        &self,
        text: &str,
        format: FormatTag,
        progress: &ProgressSink,
    ) -> Result<ImportResult, ImportError> {
        progress.emit(ProgressEvent::parsing());
        let text = non_empty(text)?;

        info!("Parsing deck list as {}", format);
        let deck = parsers::parse(format, text);
        self.finish_import(deck, progress).await
    }

    async fn finish_import(
        &self,
        deck: ParsedDeck,
        progress: &ProgressSink,
    ) -> Result<ImportResult, ImportError> {
        if deck.is_empty() {
            return Err(ImportError::Parse {
                format: deck.format,
                source: ParseError::NoCardLines {
                    format: deck.format,
                },
            });
        }
        debug!(
            "Parsed {} entries, commander {:?} (inferred: {})",
            deck.entries.len(),
            deck.commander_name,
            deck.commander_inferred
        );

        // A guessed commander carries no marker of its own
        let commander_entry = deck.commander_name.as_deref().map(|name| CardEntry {
            explicit_commander_marker: !deck.commander_inferred,
            ..CardEntry::new(name, 1)
        });
        let offset = usize::from(commander_entry.is_some());
        let entries: Vec<CardEntry> = commander_entry
            .iter()
            .chain(deck.entries.iter())
            .cloned()
            .collect();

        let outcomes = self
            .orchestrator
            .resolve_all(&self.resolver, &entries, progress)
            .await;

        let mut result = ImportResult::empty(deck.format);
        result.commander_conflict = deck.commander_conflict.clone();
        result.stats.total_entries = outcomes.len();

        let mut lines: Vec<ResolvedLine> = Vec::new();
        let mut named_commander: Option<CardRecord> = None;

        for (i, (entry, outcome)) in entries.iter().zip(outcomes).enumerate() {
            if let Some(suggestion) = outcome.suggestion() {
                result.suggestions.push(suggestion.to_string());
            }
            match outcome {
                ResolutionOutcome::Resolved {
                    record,
                    quantity,
                    step,
                    ..
                } => {
                    result.stats.resolved += 1;
                    match step {
                        ResolutionStep::Cache => result.stats.cache_hits += 1,
                        ResolutionStep::Fuzzy => result.stats.fuzzy_matches += 1,
                        ResolutionStep::Exact | ResolutionStep::Variant => {}
                    }
                    if i == 0 && commander_entry.is_some() {
                        named_commander = Some(record);
                    } else {
                        lines.push(ResolvedLine {
                            record,
                            quantity,
                            explicit_marker: entry.explicit_commander_marker,
                            source: i - offset,
                        });
                    }
                }
                ResolutionOutcome::Unresolved(card) => {
                    warn!("Could not resolve {:?}: {}", card.raw_name, card.reason);
                    result.stats.unresolved += 1;
                    result.unresolved.push(card);
                }
            }
        }

        // An inferred commander that did not resolve, or cannot lead a deck, hands over to detection
        let guess_failed = deck.commander_inferred
            && named_commander
                .as_ref()
                .map_or(true, |record| !is_commander_eligible(record));
        let run_detection = deck.commander_name.is_none() || guess_failed;

        if let Some(record) = named_commander {
            if guess_failed {
                info!("Guessed commander {} cannot lead a deck, keeping it in the main deck", record.name);
                let source = deck.commander_index.unwrap_or(0);
                let at = lines
                    .iter()
                    .position(|line| line.source >= source)
                    .unwrap_or(lines.len());
                lines.insert(
                    at,
                    ResolvedLine {
                        record,
                        quantity: 1,
                        explicit_marker: false,
                        source,
                    },
                );
            } else {
                result.commander = Some(record);
            }
        }

        if run_detection {
            progress.emit(ProgressEvent::detecting_commander());
            let candidates: Vec<CommanderCandidate<'_>> = lines
                .iter()
                .map(|line| CommanderCandidate {
                    record: &line.record,
                    explicit_marker: line.explicit_marker,
                })
                .collect();
            match detect_commander(&candidates) {
                Some(pick) => {
                    info!("Detected commander {}", pick.commander.name);
                    result.commander = Some(pick.commander);
                    result.partners = pick.partners;
                }
                None => warn!("No commander could be detected"),
            }
        }

        result.main_deck = merge_lines(lines);
        let command_zone: Vec<&CardRecord> =
            result.commander.iter().chain(result.partners.iter()).collect();
        remove_commanders(&mut result.main_deck, &command_zone);

        result.stats.total_cards = result.total_cards();
        info!(
            "Imported {} deck: {} resolved, {} unresolved, {} cards",
            result.format, result.stats.resolved, result.stats.unresolved, result.stats.total_cards
        );
        progress.emit(ProgressEvent::complete());
        Ok(result)
    }
}

fn non_empty(text: &str) -> Result<&str, ImportError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ImportError::EmptyInput);
    }
    Ok(trimmed)
}

/// Main deck in first-seen order, merging names that resolved to the same card
fn merge_lines(lines: Vec<ResolvedLine>) -> Vec<DeckCard> {
    let mut deck: Vec<DeckCard> = Vec::new();
    for line in lines {
        match deck.iter_mut().find(|card| card.record.id == line.record.id) {
            Some(card) => card.quantity += line.quantity,
            None => deck.push(DeckCard {
                record: line.record,
                quantity: line.quantity,
            }),
        }
    }
    deck
}

#[cfg(test)]
#[path = "importer_tests.rs"]
mod tests;

//! Card name resolution.
//!
//! A raw name is canonicalised and pushed through a fixed ladder of lookup
//! steps: cache, exact search, spelling variants, fuzzy search. Each step
//! reports a hit, a miss or a failure; the first hit ends the ladder and is
//! cached under the canonical input name. Failures from the card database
//! are logged and treated as misses.

use log::{debug, warn};
use mtg_common::{CardDatabase, CardRecord, ScryfallError};
use std::sync::Arc;

use crate::cache::CardCache;
use crate::canonicalize::{cache_key, canonicalize};
use crate::matching::{first_token, name_distance, name_variants};
use crate::models::{CardEntry, ResolutionOutcome, ResolutionStep, UnresolvedCard};

/// Fuzzy candidates considered from the head of the search results
pub const FUZZY_CANDIDATES: usize = 10;
/// Largest edit distance accepted as a correction
pub const FUZZY_MAX_DISTANCE: usize = 2;
/// Largest edit distance still offered as a hint for an unresolved name
pub const HINT_MAX_DISTANCE: usize = 5;

const LADDER: [ResolutionStep; 4] = [
    ResolutionStep::Cache,
    ResolutionStep::Exact,
    ResolutionStep::Variant,
    ResolutionStep::Fuzzy,
];

/// Outcome of resolving one raw name
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub record: Option<CardRecord>,
    pub error: Option<String>,
    pub suggestion: Option<String>,
    pub step: Option<ResolutionStep>,
}

impl Resolution {
    fn resolved(record: CardRecord, suggestion: Option<String>, step: ResolutionStep) -> Self {
        Self {
            record: Some(record),
            error: None,
            suggestion,
            step: Some(step),
        }
    }

    fn unresolved(raw_name: &str, suggestion: Option<String>) -> Self {
        Self {
            record: None,
            error: Some(format!("Unrecognized card name: {}", raw_name)),
            suggestion,
            step: None,
        }
    }

    /// Attach the entry's quantity and marker
    pub fn into_outcome(self, entry: &CardEntry) -> ResolutionOutcome {
        match self.record {
            Some(record) => ResolutionOutcome::Resolved {
                record,
                quantity: entry.quantity,
                suggestion: self.suggestion,
                step: self.step.unwrap_or(ResolutionStep::Exact),
            },
            None => ResolutionOutcome::Unresolved(UnresolvedCard {
                raw_name: entry.raw_name.clone(),
                quantity: entry.quantity,
                reason: self
                    .error
                    .unwrap_or_else(|| format!("Unrecognized card name: {}", entry.raw_name)),
                suggestion: self.suggestion,
                was_commander: entry.explicit_commander_marker,
            }),
        }
    }
}

/// Result of a single ladder step
#[derive(Debug)]
enum StepResult {
    Hit {
        record: CardRecord,
        suggestion: Option<String>,
    },
    Miss {
        hint: Option<String>,
    },
    Failed(ScryfallError),
}

impl StepResult {
    fn miss() -> Self {
        StepResult::Miss { hint: None }
    }
}

fn correction(canonical: &str, record: &CardRecord) -> Option<String> {
    let distance = name_distance(canonical, &record.name);
    (distance > 0 && distance <= FUZZY_MAX_DISTANCE)
        .then(|| format!("Corrected \"{}\" to \"{}\"", canonical, record.name))
}

fn same_name(query: &str, record: &CardRecord) -> bool {
    record.name.eq_ignore_ascii_case(query) || record.front_face_name().eq_ignore_ascii_case(query)
}

/// Resolves card names against a [`CardDatabase`], sharing a [`CardCache`]
pub struct CardResolver<D> {
    database: D,
    cache: Arc<CardCache>,
}

impl<D: CardDatabase> CardResolver<D> {
    pub fn new(database: D, cache: Arc<CardCache>) -> Self {
        Self { database, cache }
    }

    pub fn cache(&self) -> &Arc<CardCache> {
        &self.cache
    }

    pub fn database(&self) -> &D {
        &self.database
    }

    /// Resolve a raw card token; never fails, misses come back with `error` set
    pub async fn resolve(&self, raw_name: &str) -> Resolution {
        let canonical = canonicalize(raw_name);
        if canonical.is_empty() {
            return Resolution::unresolved(raw_name, None);
        }
        let key = cache_key(&canonical);
        let mut hint = None;

        for step in LADDER {
            match self.run_step(step, &canonical, &key).await {
                StepResult::Hit { record, suggestion } => {
                    debug!("Resolved {:?} via {:?} as {}", raw_name, step, record.name);
                    if step != ResolutionStep::Cache {
                        self.cache.put(&key, &record);
                    }
                    return Resolution::resolved(record, suggestion, step);
                }
                StepResult::Miss { hint: step_hint } => {
                    debug!("{:?} lookup missed for {:?}", step, canonical);
                    hint = step_hint.or(hint);
                }
                StepResult::Failed(e) => {
                    warn!("{:?} lookup failed for {:?}: {}", step, canonical, e);
                }
            }
        }

        Resolution::unresolved(raw_name, hint)
    }

    /// Resolve a parsed entry into an outcome carrying its quantity
    pub async fn resolve_entry(&self, entry: &CardEntry) -> ResolutionOutcome {
        self.resolve(&entry.raw_name).await.into_outcome(entry)
    }

    async fn run_step(&self, step: ResolutionStep, canonical: &str, key: &str) -> StepResult {
        match step {
            ResolutionStep::Cache => self.from_cache(canonical, key),
            ResolutionStep::Exact => self.exact(canonical).await,
            ResolutionStep::Variant => self.variants(canonical).await,
            ResolutionStep::Fuzzy => self.fuzzy(canonical).await,
        }
    }

    fn from_cache(&self, canonical: &str, key: &str) -> StepResult {
        match self.cache.get(key) {
            Some(record) => {
                let suggestion = correction(canonical, &record);
                StepResult::Hit { record, suggestion }
            }
            None => StepResult::miss(),
        }
    }

    async fn search_exact(&self, name: &str) -> Result<Option<CardRecord>, ScryfallError> {
        let cards = self.database.search_exact(name).await?;
        let exact = cards.iter().position(|card| same_name(name, card));
        Ok(match exact {
            Some(i) => cards.into_iter().nth(i),
            None => cards.into_iter().next(),
        })
    }

    async fn exact(&self, canonical: &str) -> StepResult {
        match self.search_exact(canonical).await {
            Ok(Some(record)) => StepResult::Hit {
                record,
                suggestion: None,
            },
            Ok(None) => StepResult::miss(),
            Err(e) => StepResult::Failed(e),
        }
    }

    async fn variants(&self, canonical: &str) -> StepResult {
        let mut last_error = None;
        for variant in name_variants(canonical) {
            match self.search_exact(&variant).await {
                Ok(Some(record)) => {
                    debug!("Variant {:?} matched {}", variant, record.name);
                    return StepResult::Hit {
                        record,
                        suggestion: None,
                    };
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("Variant lookup failed for {:?}: {}", variant, e);
                    last_error = Some(e);
                }
            }
        }
        match last_error {
            Some(e) => StepResult::Failed(e),
            None => StepResult::miss(),
        }
    }

    async fn fuzzy(&self, canonical: &str) -> StepResult {
        let Some(token) = first_token(canonical) else {
            return StepResult::miss();
        };
        let cards = match self.database.search(&token).await {
            Ok(cards) => cards,
            Err(e) => return StepResult::Failed(e),
        };

        // Strict less-than keeps the service's ordering on ties
        let mut best: Option<(usize, CardRecord)> = None;
        for card in cards.into_iter().take(FUZZY_CANDIDATES) {
            let distance = name_distance(canonical, &card.name);
            if best.as_ref().map_or(true, |(d, _)| distance < *d) {
                best = Some((distance, card));
            }
        }

        match best {
            Some((distance, record)) if distance <= FUZZY_MAX_DISTANCE => {
                let suggestion = correction(canonical, &record);
                StepResult::Hit { record, suggestion }
            }
            Some((distance, record)) if distance <= HINT_MAX_DISTANCE => StepResult::Miss {
                hint: Some(format!("Did you mean \"{}\"?", record.name)),
            },
            _ => StepResult::miss(),
        }
    }
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;

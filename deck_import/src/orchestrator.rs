use log::{debug, info};
use mtg_common::CardDatabase;
use std::time::Duration;

use crate::config::ImportConfig;
use crate::models::{CardEntry, ResolutionOutcome};
use crate::progress::{ProgressEvent, ProgressSink};
use crate::resolver::CardResolver;

/// Paces resolution to stay under the card database's rate limit.
///
/// Entries are split into batches of `batch_size` and resolved strictly one
/// at a time, pausing `card_delay` between cards of a batch and
/// `batch_delay` between batches. Output order matches input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOrchestrator {
    batch_size: usize,
    card_delay: Duration,
    batch_delay: Duration,
}

impl BatchOrchestrator {
    pub fn new(batch_size: usize, card_delay: Duration, batch_delay: Duration) -> Self {
        Self {
            batch_size: batch_size.max(1),
            card_delay,
            batch_delay,
        }
    }

    pub fn from_config(config: &ImportConfig) -> Self {
        Self::new(config.batch_size, config.card_delay(), config.batch_delay())
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Resolve every entry, emitting one `resolving` event per card
    pub async fn resolve_all<D: CardDatabase>(
        &self,
        resolver: &CardResolver<D>,
        entries: &[CardEntry],
        progress: &ProgressSink,
    ) -> Vec<ResolutionOutcome> {
        let total = entries.len();
        let batch_count = total.div_ceil(self.batch_size);
        let mut outcomes = Vec::with_capacity(total);

        info!(
            "Resolving {} entries in {} batch(es) of up to {}",
            total, batch_count, self.batch_size
        );

        for (batch_index, batch) in entries.chunks(self.batch_size).enumerate() {
            if batch_index > 0 {
                pause(self.batch_delay).await;
            }
            debug!("Batch {}/{}", batch_index + 1, batch_count);

            for (i, entry) in batch.iter().enumerate() {
                if i > 0 {
                    pause(self.card_delay).await;
                }
                outcomes.push(resolver.resolve_entry(entry).await);
                progress.emit(ProgressEvent::resolving(outcomes.len(), total, &entry.raw_name));
            }
        }

        outcomes
    }
}

impl Default for BatchOrchestrator {
    fn default() -> Self {
        Self::from_config(&ImportConfig::default())
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

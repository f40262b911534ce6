//! Fallback for lists with no recognisable exporter fingerprint.
//!
//! Accepts bare names as single copies and takes sections from headers or
//! comment keywords ("// Commander"). With no marker anywhere, the first
//! single-copy line is guessed to be the commander. When a marker exists but
//! names a different card than that guess, the marker wins and the guess is
//! kept as a conflict for the validator to report.

use log::debug;

use super::line::DeckBuilder;
use super::{keep_section, parse_sectioned, LineMode};
use crate::models::{FormatTag, ParsedDeck};

pub fn parse(text: &str) -> ParsedDeck {
    let mut builder = DeckBuilder::new(FormatTag::Generic);
    parse_sectioned(text, &mut builder, LineMode::Loose, keep_section);

    if let Some(first) = builder.first_single().map(str::to_string) {
        if builder.commander_count() == 0 {
            debug!("Guessing first single-copy line as commander: {first}");
            builder.infer_commander(&first);
        } else if !builder.is_marked_commander(&first) {
            debug!("Explicit commander overrides first-card guess: {first}");
            builder.record_conflict(&first);
        }
    }
    builder.finish()
}

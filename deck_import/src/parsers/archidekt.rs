//! Archidekt export: "1x <name> (set) 123 [Category,...]".
//!
//! Categories replace section headers. `[Commander{top}]` marks the
//! commander; Sideboard/Maybeboard categories and `{noDeck}` cards stay out of the deck.

use super::line::{content_lines, has_bracket_tag, CardLine, DeckBuilder, Section};
use super::{parse_sectioned, LineMode};
use crate::models::{FormatTag, ParsedDeck};

pub fn detect(text: &str) -> bool {
    content_lines(text).iter().any(|line| has_bracket_tag(line))
}

fn route(card: &CardLine, section: Section) -> Section {
    if card.commander_marker {
        return Section::Commander;
    }
    let outside_deck = card.tags.iter().any(|tag| {
        let lower = tag.to_lowercase();
        lower.contains("{nodeck}")
            || lower
                .split(',')
                .map(|part| part.split('{').next().unwrap_or("").trim())
                .any(|part| matches!(part, "sideboard" | "maybeboard" | "considering"))
    });
    if outside_deck {
        Section::Sideboard
    } else {
        section
    }
}

pub fn parse(text: &str) -> ParsedDeck {
    let mut builder = DeckBuilder::new(FormatTag::Archidekt);
    parse_sectioned(text, &mut builder, LineMode::Strict, route);
    builder.finish()
}

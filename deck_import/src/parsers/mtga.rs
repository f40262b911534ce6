//! MTG Arena export: bare "Commander", "Deck", "Sideboard" headers and an
//! optional "About" / "Name <deck name>" preamble.

use super::line::{content_lines, DeckBuilder};
use super::{keep_section, parse_sectioned, LineMode};
use crate::models::{FormatTag, ParsedDeck};

fn is_preamble(line: &str) -> bool {
    line.eq_ignore_ascii_case("about") || line.starts_with("Name ")
}

pub fn detect(text: &str) -> bool {
    let lines = content_lines(text);
    lines.iter().any(|line| line.eq_ignore_ascii_case("deck"))
        || (lines.iter().any(|line| line.eq_ignore_ascii_case("about"))
            && lines.iter().any(|line| line.starts_with("Name ")))
}

pub fn parse(text: &str) -> ParsedDeck {
    let body: Vec<&str> = text
        .lines()
        .filter(|line| !is_preamble(line.trim()))
        .collect();

    let mut builder = DeckBuilder::new(FormatTag::Mtga);
    parse_sectioned(&body.join("\n"), &mut builder, LineMode::Strict, keep_section);
    builder.finish()
}

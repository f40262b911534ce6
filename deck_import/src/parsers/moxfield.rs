//! Moxfield text export.
//!
//! Either labelled sections ("Commander: <name>", "Main:", "Sideboard:") or
//! a flat list whose lines end in a `(SET) 123` column.

use lazy_static::lazy_static;
use regex::Regex;

use super::line::{content_lines, has_cmdr_flag, has_set_code_column, parse_card_line, DeckBuilder};
use super::{keep_section, parse_sectioned, LineMode};
use crate::models::{FormatTag, ParsedDeck};

lazy_static! {
    static ref COMMANDER_LABEL: Regex = Regex::new(r"(?i)^commanders?\s*(?:\(\d+\))?\s*:").unwrap();
}

/// A literal "Commander:" line
pub fn has_commander_label(text: &str) -> bool {
    content_lines(text)
        .iter()
        .any(|line| COMMANDER_LABEL.is_match(line))
}

/// Most data lines carry a set-code column and no line carries `*CMDR*`
pub fn has_set_code_columns(text: &str) -> bool {
    let lines = content_lines(text);
    if lines.iter().any(|line| has_cmdr_flag(line)) {
        return false;
    }
    let data = lines.iter().filter(|l| parse_card_line(l).is_some()).count();
    let with_set = lines.iter().filter(|l| has_set_code_column(l)).count();
    with_set > 0 && with_set * 2 >= data
}

pub fn parse(text: &str) -> ParsedDeck {
    let mut builder = DeckBuilder::new(FormatTag::Moxfield);
    parse_sectioned(text, &mut builder, LineMode::Strict, keep_section);
    builder.finish()
}

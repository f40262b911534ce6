//! EDHREC deck export: "1x <name>" lines, commander flagged with a trailing `*CMDR*`.

use super::line::{content_lines, has_cmdr_flag, DeckBuilder};
use super::{keep_section, parse_sectioned, LineMode};
use crate::models::{FormatTag, ParsedDeck};

pub fn detect(text: &str) -> bool {
    content_lines(text).iter().any(|line| has_cmdr_flag(line))
}

pub fn parse(text: &str) -> ParsedDeck {
    let mut builder = DeckBuilder::new(FormatTag::Edhrec);
    parse_sectioned(text, &mut builder, LineMode::Strict, keep_section);
    builder.finish()
}

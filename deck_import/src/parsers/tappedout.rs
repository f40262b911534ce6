//! TappedOut export.
//!
//! Shares the `*CMDR*` marker with EDHREC but also prints printing details:
//! a `(SET) 123` column or other asterisk flags such as `*F*` for foils.

use super::line::{content_lines, has_cmdr_flag, has_other_flag, has_set_code_column, DeckBuilder};
use super::{keep_section, parse_sectioned, LineMode};
use crate::models::{FormatTag, ParsedDeck};

pub fn detect(text: &str) -> bool {
    let lines = content_lines(text);
    lines.iter().any(|line| has_cmdr_flag(line))
        && lines
            .iter()
            .any(|line| has_other_flag(line) || has_set_code_column(line))
}

pub fn parse(text: &str) -> ParsedDeck {
    let mut builder = DeckBuilder::new(FormatTag::Tappedout);
    parse_sectioned(text, &mut builder, LineMode::Strict, keep_section);
    builder.finish()
}

//! Dialect parsers.
//!
//! One module per deck exporter. Each exposes `parse(text) -> ParsedDeck`
//! and never fails on a single line it does not understand; such lines are
//! skipped with a debug log.
//!
//! - [`line`] - quantity/marker/section helpers and the duplicate-summing [`line::DeckBuilder`]
//! - [`moxfield`], [`edhrec`], [`archidekt`], [`tappedout`], [`mtggoldfish`],
//!   [`mtga`], [`mtgo`], [`generic`] - one parser per dialect

pub mod archidekt;
pub mod edhrec;
pub mod generic;
pub mod line;
pub mod moxfield;
pub mod mtga;
pub mod mtggoldfish;
pub mod mtgo;
pub mod tappedout;

use log::debug;

use crate::models::{FormatTag, ParsedDeck};
use line::{
    comment_section, is_comment, parse_card_line, parse_loose_line, section_header, CardLine,
    DeckBuilder, Section,
};

/// Parse `text` with the parser for `format`
pub fn parse(format: FormatTag, text: &str) -> ParsedDeck {
    match format {
        FormatTag::Moxfield => moxfield::parse(text),
        FormatTag::Edhrec => edhrec::parse(text),
        FormatTag::Archidekt => archidekt::parse(text),
        FormatTag::Tappedout => tappedout::parse(text),
        FormatTag::Mtggoldfish => mtggoldfish::parse(text),
        FormatTag::Mtga => mtga::parse(text),
        FormatTag::Mtgo => mtgo::parse(text),
        FormatTag::Generic => generic::parse(text),
    }
}

/// Whether data lines need a leading quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineMode {
    Strict,
    Loose,
}

/// Section routing hook; most dialects keep the header-derived section
pub(crate) fn keep_section(_card: &CardLine, section: Section) -> Section {
    section
}

/// Shared header-driven parse loop.
///
/// Header lines and comment keywords switch the current section; a blank line
/// closes a commander section that already holds a card.
pub(crate) fn parse_sectioned(
    text: &str,
    builder: &mut DeckBuilder,
    mode: LineMode,
    route: fn(&CardLine, Section) -> Section,
) {
    let mut section = Section::Mainboard;
    let mut in_section = 0usize;

    for raw in text.lines() {
        let line = raw.trim();

        if line.is_empty() {
            if section == Section::Commander && in_section > 0 {
                section = Section::Mainboard;
                in_section = 0;
            }
            continue;
        }

        if let Some(header) = section_header(line) {
            debug!("Section header {:?}: {}", header.section, line);
            section = header.section;
            in_section = 0;
            if let Some(card) = header.inline.as_deref().and_then(parse_loose_line) {
                builder.add_line(&card, route(&card, section));
                in_section += 1;
            }
            continue;
        }

        if is_comment(line) {
            if let Some(next) = comment_section(line) {
                section = next;
                in_section = 0;
            }
            continue;
        }

        let card = match mode {
            LineMode::Strict => parse_card_line(line),
            LineMode::Loose => parse_loose_line(line),
        };
        match card {
            Some(card) => {
                builder.add_line(&card, route(&card, section));
                in_section += 1;
            }
            None => debug!("Skipping unrecognised line: {line}"),
        }
    }
}

#[cfg(test)]
#[path = "parsers_tests.rs"]
mod tests;

//! MTGO export: a flat "1 <name>" list with no headers or markers. The
//! commander travels in the sideboard, printed as a final block of one or
//! two single copies after a blank line (or after "SIDEBOARD:").

use super::line::{is_comment, parse_card_line, section_header, DeckBuilder, Section};
use crate::models::{FormatTag, ParsedDeck};
use log::debug;

/// Main-list length below which a trailing block is not taken as a sideboard commander
pub const MIN_MAIN_LINES: usize = 20;

/// Blank-line separated blocks of trimmed lines
fn blocks(text: &str) -> Vec<Vec<&str>> {
    let mut blocks = vec![Vec::new()];
    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            if blocks.last().map_or(false, |b| !b.is_empty()) {
                blocks.push(Vec::new());
            }
        } else if let Some(block) = blocks.last_mut() {
            block.push(line);
        }
    }
    blocks.retain(|b| !b.is_empty());
    blocks
}

fn is_commander_block(block: &[&str]) -> bool {
    (1..=2).contains(&block.len())
        && block
            .iter()
            .all(|line| parse_card_line(line).map_or(false, |card| card.quantity == 1))
}

pub fn detect(text: &str) -> bool {
    let blocks = blocks(text);
    let Some((last, rest)) = blocks.split_last() else {
        return false;
    };
    if rest.is_empty() || !is_commander_block(last) {
        return false;
    }
    let main: Vec<&str> = rest.iter().flatten().copied().collect();
    main.iter()
        .all(|line| !is_comment(line) && section_header(line).is_none())
        && main.iter().filter(|line| parse_card_line(line).is_some()).count() >= MIN_MAIN_LINES
}

pub fn parse(text: &str) -> ParsedDeck {
    let blocks = blocks(text);
    let trailing_commander = blocks.len() > 1 && blocks.last().map_or(false, |b| is_commander_block(b));
    let mut builder = DeckBuilder::new(FormatTag::Mtgo);

    for (i, block) in blocks.iter().enumerate() {
        let mut section = if trailing_commander && i == blocks.len() - 1 {
            Section::Commander
        } else {
            Section::Mainboard
        };
        for line in block {
            if let Some(header) = section_header(line) {
                // MTGO keeps the commander in the sideboard
                section = match header.section {
                    Section::Sideboard | Section::Commander => Section::Commander,
                    other => other,
                };
                continue;
            }
            match parse_card_line(line) {
                Some(card) => builder.add_line(&card, section),
                None => debug!("Skipping unrecognised line: {line}"),
            }
        }
    }
    builder.finish()
}

//! MTGGoldfish export: a single "Name <commander> <theme>" title line
//! followed by plain "1 <name>" lines. The commander is whichever card the
//! title starts with.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use super::line::{content_lines, parse_card_line, DeckBuilder};
use super::{keep_section, parse_sectioned, LineMode};
use crate::canonicalize::canonicalize;
use crate::models::{CardEntry, FormatTag, ParsedDeck};

lazy_static! {
    static ref TITLE: Regex = Regex::new(r"^Name\s+(\S.*)$").unwrap();
}

fn title(text: &str) -> Option<String> {
    let first = content_lines(text).into_iter().next()?;
    if parse_card_line(first).is_some() {
        return None;
    }
    TITLE
        .captures(first)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

pub fn detect(text: &str) -> bool {
    title(text).is_some()
        && content_lines(text)
            .iter()
            .skip(1)
            .any(|line| parse_card_line(line).is_some())
}

/// Entry whose full name, or name up to the first comma, begins the title; longest match wins
fn commander_from_title(title: &str, entries: &[CardEntry]) -> Option<String> {
    let title = title.to_lowercase();
    entries
        .iter()
        .filter(|entry| !entry.explicit_commander_marker)
        .filter_map(|entry| {
            let full = canonicalize(&entry.raw_name).to_lowercase();
            let short = full.split(',').next().unwrap_or("").trim().to_string();
            [full, short]
                .into_iter()
                .filter(|candidate| candidate.len() >= 3 && title.starts_with(candidate.as_str()))
                .filter(|candidate| {
                    title[candidate.len()..]
                        .chars()
                        .next()
                        .map_or(true, |c| !c.is_alphanumeric())
                })
                .map(|candidate| candidate.len())
                .max()
                .map(|len| (len, entry.raw_name.clone()))
        })
        .max_by_key(|(len, _)| *len)
        .map(|(_, raw)| raw)
}

pub fn parse(text: &str) -> ParsedDeck {
    let deck_title = title(text);
    let body = match deck_title {
        Some(_) => text
            .trim_start()
            .split_once('\n')
            .map(|(_, rest)| rest)
            .unwrap_or(""),
        None => text,
    };

    let mut builder = DeckBuilder::new(FormatTag::Mtggoldfish);
    parse_sectioned(body, &mut builder, LineMode::Strict, keep_section);

    if builder.commander_count() == 0 {
        if let Some(deck_title) = deck_title.as_deref() {
            match commander_from_title(deck_title, builder.entries()) {
                Some(raw) => builder.infer_commander(&raw),
                None => debug!("No card matches deck title: {deck_title}"),
            }
        }
    }
    builder.finish()
}

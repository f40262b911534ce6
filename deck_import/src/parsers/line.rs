//! Line-level helpers shared by every dialect parser.

use crate::canonicalize::{cache_key, canonicalize};
use crate::models::{CardEntry, FormatTag, ParsedDeck};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use std::collections::HashMap;

lazy_static! {
    static ref QUANTITY_LINE: Regex = Regex::new(r"^(\d+)\s*[xX]?\s+(.+)$").unwrap();
    static ref CMDR_FLAG: Regex = Regex::new(r"(?i)\*\s*cmdr\s*\*").unwrap();
    static ref OTHER_FLAG: Regex = Regex::new(r"\*[A-Za-z]{1,2}\*").unwrap();
    static ref BRACKET_TAG: Regex = Regex::new(r"\[([^\]]*)\]").unwrap();
    static ref CARET_LABEL: Regex = Regex::new(r"\^[^\^]*\^").unwrap();
    static ref COMMANDER_PAREN: Regex = Regex::new(r"(?i)\(\s*commander\s*\)").unwrap();
    static ref COMMANDER_BRACE: Regex = Regex::new(r"(?i)\{\s*commander\s*\}").unwrap();
    static ref SET_CODE_COLUMN: Regex =
        Regex::new(r"\([A-Za-z0-9]{2,6}\)\s+[A-Za-z0-9★\-]+\s*$").unwrap();
    static ref SECTION_HEADER: Regex = Regex::new(
        r"(?i)^(commanders?|main\s*deck|mainboard|main|deck|sideboard|maybeboard|considering|companions?)\s*(?:\(\d+\))?\s*(?::\s*(.*))?$"
    )
    .unwrap();
}

/// Part of the deck a line belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Commander,
    Mainboard,
    Sideboard,
    Unknown,
}

/// A recognised section header, possibly with a card on the same line ("Commander: Alesha")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHeader {
    pub section: Section,
    pub inline: Option<String>,
}

/// A data line split into quantity, name and markers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardLine {
    pub quantity: u32,
    /// Name with quantity, bracket tags and commander markers removed
    pub name: String,
    pub commander_marker: bool,
    /// Contents of `[...]` tags, in order
    pub tags: Vec<String>,
}

/// Non-blank, trimmed lines of `text`
pub fn content_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

pub fn is_comment(line: &str) -> bool {
    line.starts_with("//") || line.starts_with('#')
}

/// Section named by a header line such as "Commander", "Main:", "Sideboard (10)"
pub fn section_header(line: &str) -> Option<SectionHeader> {
    let caps = SECTION_HEADER.captures(line.trim())?;
    let word = caps.get(1)?.as_str().to_lowercase();
    let section = if word.starts_with("commander") {
        Section::Commander
    } else if word.starts_with("main") || word == "deck" {
        Section::Mainboard
    } else {
        Section::Sideboard
    };
    let inline = caps
        .get(2)
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty());
    Some(SectionHeader { section, inline })
}

/// Section implied by keywords in a comment line ("// Commander", "# Sideboard")
pub fn comment_section(line: &str) -> Option<Section> {
    if !is_comment(line) {
        return None;
    }
    let lower = line.to_lowercase();
    if lower.contains("commander") {
        Some(Section::Commander)
    } else if lower.contains("sideboard") || lower.contains("maybe") || lower.contains("considering")
    {
        Some(Section::Sideboard)
    } else if lower.contains("main") || lower.contains("deck") || lower.chars().any(char::is_alphabetic)
    {
        // Category comments such as "// Creatures (30)" are main-deck groupings
        Some(Section::Mainboard)
    } else {
        None
    }
}

pub fn has_cmdr_flag(line: &str) -> bool {
    CMDR_FLAG.is_match(line)
}

/// Asterisk flag other than `*CMDR*` (foil `*F*`, etched `*E*`, ...)
pub fn has_other_flag(line: &str) -> bool {
    OTHER_FLAG.is_match(line)
}

/// Data line carrying a `[Category]` tag
pub fn has_bracket_tag(line: &str) -> bool {
    QUANTITY_LINE.is_match(line) && BRACKET_TAG.is_match(line)
}

/// Data line ending in a `(SET) 123` column
pub fn has_set_code_column(line: &str) -> bool {
    match parse_card_line(line) {
        Some(card) => SET_CODE_COLUMN.is_match(&card.name),
        None => false,
    }
}

/// Parse "<integer>[x] <name...>"; lines without a leading quantity are rejected
pub fn parse_card_line(line: &str) -> Option<CardLine> {
    let caps = QUANTITY_LINE.captures(line.trim())?;
    let quantity: u32 = caps.get(1)?.as_str().parse().ok()?;
    if quantity == 0 {
        debug!("Skipping zero-quantity line: {line}");
        return None;
    }
    split_markers(caps.get(2)?.as_str(), quantity)
}

/// Like [`parse_card_line`], but a bare name counts as one copy
pub fn parse_loose_line(line: &str) -> Option<CardLine> {
    if let Some(card) = parse_card_line(line) {
        return Some(card);
    }
    let trimmed = line.trim();
    if trimmed.is_empty() || is_comment(trimmed) || !trimmed.chars().any(char::is_alphabetic) {
        return None;
    }
    if trimmed.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    split_markers(trimmed, 1)
}

fn split_markers(rest: &str, quantity: u32) -> Option<CardLine> {
    let tags: Vec<String> = BRACKET_TAG
        .captures_iter(rest)
        .filter_map(|c| c.get(1).map(|m| m.as_str().trim().to_string()))
        .collect();

    let commander_marker = has_cmdr_flag(rest)
        || COMMANDER_PAREN.is_match(rest)
        || COMMANDER_BRACE.is_match(rest)
        || tags.iter().any(|tag| tag_names_commander(tag));

    let name = BRACKET_TAG.replace_all(rest, " ");
    let name = CARET_LABEL.replace_all(&name, " ");
    let name = CMDR_FLAG.replace_all(&name, " ");
    let name = COMMANDER_PAREN.replace_all(&name, " ");
    let name = COMMANDER_BRACE.replace_all(&name, " ");
    let name = name.split_whitespace().collect::<Vec<_>>().join(" ");

    if name.is_empty() {
        return None;
    }

    Some(CardLine {
        quantity,
        name,
        commander_marker,
        tags,
    })
}

/// Archidekt-style tag lists: "Commander{top}", "Ramp,Removal"
fn tag_names_commander(tag: &str) -> bool {
    tag.split(',')
        .map(|part| part.split('{').next().unwrap_or("").trim())
        .any(|part| part.eq_ignore_ascii_case("commander"))
}

/// Collects entries for one parse, summing duplicates by canonical name
#[derive(Debug)]
pub struct DeckBuilder {
    format: FormatTag,
    entries: Vec<CardEntry>,
    index: HashMap<String, usize>,
    first_single: Option<String>,
    inferred_commander: Option<String>,
    commander_conflict: Option<String>,
}

impl DeckBuilder {
    pub fn new(format: FormatTag) -> Self {
        Self {
            format,
            entries: Vec::new(),
            index: HashMap::new(),
            first_single: None,
            inferred_commander: None,
            commander_conflict: None,
        }
    }

    /// Add a main-deck line
    pub fn add_entry(&mut self, raw_name: &str, quantity: u32) {
        let key = cache_key(&canonicalize(raw_name));
        if key.is_empty() || quantity == 0 {
            return;
        }
        match self.index.get(&key) {
            Some(&i) => self.entries[i].quantity += quantity,
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push(CardEntry::new(raw_name, quantity));
            }
        }
    }

    /// Add a line that is explicitly marked or sectioned as commander
    pub fn add_commander(&mut self, raw_name: &str) {
        let canonical = canonicalize(raw_name);
        if canonical.is_empty() {
            return;
        }
        if !self.is_marked_commander(&canonical) {
            self.entries.push(CardEntry::commander(raw_name));
        }
    }

    /// Route a parsed line by its marker and the current section
    pub fn add_line(&mut self, card: &CardLine, section: Section) {
        if section != Section::Sideboard && card.quantity == 1 && self.first_single.is_none() {
            self.first_single = Some(card.name.clone());
        }
        match section {
            Section::Sideboard => debug!("Skipping sideboard line: {}", card.name),
            Section::Commander => self.add_commander(&card.name),
            Section::Mainboard | Section::Unknown if card.commander_marker => {
                self.add_commander(&card.name)
            }
            Section::Mainboard | Section::Unknown => self.add_entry(&card.name, card.quantity),
        }
    }

    /// Entries collected so far, commanders included
    pub fn entries(&self) -> &[CardEntry] {
        &self.entries
    }

    /// First quantity-1 line seen so far, in any non-sideboard section
    pub fn first_single(&self) -> Option<&str> {
        self.first_single.as_deref()
    }

    pub fn commander_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.explicit_commander_marker)
            .count()
    }

    /// Whether `raw_name` was added as an explicit commander
    pub fn is_marked_commander(&self, raw_name: &str) -> bool {
        let key = cache_key(&canonicalize(raw_name));
        self.entries.iter().any(|e| {
            e.explicit_commander_marker && cache_key(&canonicalize(&e.raw_name)) == key
        })
    }

    /// Use `raw_name` as a guessed commander when no explicit one exists
    pub fn infer_commander(&mut self, raw_name: &str) {
        self.inferred_commander = Some(raw_name.to_string());
    }

    /// Record the first-card guess that an explicit marker overrode
    pub fn record_conflict(&mut self, raw_name: &str) {
        self.commander_conflict = Some(canonicalize(raw_name));
    }

    /// Build the deck. A single commander is lifted out of the entries;
    /// two or more stay in place, flagged, for the commander detector.
    pub fn finish(self) -> ParsedDeck {
        let mut deck = ParsedDeck::new(self.format);
        let mut entries = self.entries;

        let marked: Vec<usize> = entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.explicit_commander_marker)
            .map(|(i, _)| i)
            .collect();

        if marked.len() == 1 {
            let commander = entries.remove(marked[0]);
            deck.commander_name = Some(canonicalize(&commander.raw_name));
        } else if marked.is_empty() {
            if let Some(raw) = self.inferred_commander {
                let key = cache_key(&canonicalize(&raw));
                if let Some(pos) = entries
                    .iter()
                    .position(|e| cache_key(&canonicalize(&e.raw_name)) == key)
                {
                    if entries[pos].quantity > 1 {
                        entries[pos].quantity -= 1;
                    } else {
                        entries.remove(pos);
                    }
                    deck.commander_index = Some(pos);
                }
                deck.commander_name = Some(canonicalize(&raw));
                deck.commander_inferred = true;
            }
        }

        deck.entries = entries;
        deck.commander_conflict = self.commander_conflict;
        deck
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quantity_and_name() {
        let card = parse_card_line("4x Lightning Bolt").unwrap();
        assert_eq!(card.quantity, 4);
        assert_eq!(card.name, "Lightning Bolt");
        assert!(!card.commander_marker);

        let card = parse_card_line("1 Sol Ring (CMM) 410").unwrap();
        assert_eq!(card.name, "Sol Ring (CMM) 410");
    }

    #[test]
    fn rejects_lines_without_quantity() {
        assert!(parse_card_line("Sol Ring").is_none());
        assert!(parse_card_line("0 Sol Ring").is_none());
        assert!(parse_card_line("").is_none());
    }

    #[test]
    fn loose_line_defaults_to_one_copy() {
        let card = parse_loose_line("Sol Ring").unwrap();
        assert_eq!(card.quantity, 1);
        assert!(parse_loose_line("// Creatures").is_none());
        assert!(parse_loose_line("12345").is_none());
    }

    #[test]
    fn detects_every_commander_marker() {
        for line in [
            "1x Alesha, Who Smiles at Death *CMDR*",
            "1x Alesha, Who Smiles at Death (ktk) 163 [Commander{top}]",
            "1 Alesha, Who Smiles at Death (Commander)",
            "1 Alesha, Who Smiles at Death {commander}",
        ] {
            let card = parse_card_line(line).unwrap();
            assert!(card.commander_marker, "marker missed in {line:?}");
            assert_eq!(
                canonicalize(&card.name),
                "Alesha, Who Smiles at Death",
                "bad name for {line:?}"
            );
        }
    }

    #[test]
    fn bracket_tags_are_collected_and_removed() {
        let card = parse_card_line("1x Sol Ring (cmm) 410 [Ramp,Artifact] ^Have,#37d67a^").unwrap();
        assert_eq!(card.tags, vec!["Ramp,Artifact"]);
        assert_eq!(card.name, "Sol Ring (cmm) 410");
        assert!(!card.commander_marker);
    }

    #[test]
    fn recognises_section_headers() {
        assert_eq!(section_header("Commander").unwrap().section, Section::Commander);
        assert_eq!(section_header("Mainboard (99)").unwrap().section, Section::Mainboard);
        assert_eq!(section_header("Deck").unwrap().section, Section::Mainboard);
        assert_eq!(section_header("SIDEBOARD:").unwrap().section, Section::Sideboard);

        let header = section_header("Commander: Alesha, Who Smiles at Death").unwrap();
        assert_eq!(header.inline.as_deref(), Some("Alesha, Who Smiles at Death"));

        assert!(section_header("Commander's Sphere").is_none());
        assert!(section_header("1 Deck of Many Things").is_none());
    }

    #[test]
    fn comment_keywords_select_sections() {
        assert_eq!(comment_section("// Commander"), Some(Section::Commander));
        assert_eq!(comment_section("# Sideboard"), Some(Section::Sideboard));
        assert_eq!(comment_section("// Creatures (30)"), Some(Section::Mainboard));
        assert_eq!(comment_section("Sol Ring"), None);
    }

    #[test]
    fn builder_sums_duplicates_by_canonical_name() {
        let mut builder = DeckBuilder::new(FormatTag::Generic);
        builder.add_entry("Forest", 10);
        builder.add_entry("Forest (KHM) 393", 5);
        builder.add_entry("forest", 1);
        let deck = builder.finish();

        assert_eq!(deck.entries.len(), 1);
        assert_eq!(deck.entries[0].quantity, 16);
    }

    #[test]
    fn builder_lifts_single_commander() {
        let mut builder = DeckBuilder::new(FormatTag::Edhrec);
        builder.add_commander("Alesha, Who Smiles at Death");
        builder.add_entry("Sol Ring", 1);
        let deck = builder.finish();

        assert_eq!(deck.commander_name.as_deref(), Some("Alesha, Who Smiles at Death"));
        assert_eq!(deck.entries, vec![CardEntry::new("Sol Ring", 1)]);
    }

    #[test]
    fn builder_keeps_two_commanders_flagged() {
        let mut builder = DeckBuilder::new(FormatTag::Edhrec);
        builder.add_commander("Thrasios, Triton Hero");
        builder.add_commander("Tymna the Weaver");
        builder.add_entry("Sol Ring", 1);
        let deck = builder.finish();

        assert!(deck.commander_name.is_none());
        assert_eq!(deck.entries.len(), 3);
        assert_eq!(
            deck.entries
                .iter()
                .filter(|e| e.explicit_commander_marker)
                .count(),
            2
        );
    }
}

use mtg_common::CardRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Text dialect a deck list was exported in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatTag {
    Moxfield,
    Edhrec,
    Archidekt,
    Tappedout,
    Mtggoldfish,
    Mtga,
    Mtgo,
    Generic,
}

impl FormatTag {
    /// Returns the lowercase tag (e.g., "moxfield", "mtga")
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatTag::Moxfield => "moxfield",
            FormatTag::Edhrec => "edhrec",
            FormatTag::Archidekt => "archidekt",
            FormatTag::Tappedout => "tappedout",
            FormatTag::Mtggoldfish => "mtggoldfish",
            FormatTag::Mtga => "mtga",
            FormatTag::Mtgo => "mtgo",
            FormatTag::Generic => "generic",
        }
    }

    /// Returns all supported dialects
    pub fn all() -> &'static [FormatTag] {
        &[
            FormatTag::Moxfield,
            FormatTag::Edhrec,
            FormatTag::Archidekt,
            FormatTag::Tappedout,
            FormatTag::Mtggoldfish,
            FormatTag::Mtga,
            FormatTag::Mtgo,
            FormatTag::Generic,
        ]
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        FormatTag::all()
            .iter()
            .copied()
            .find(|tag| tag.as_str() == wanted)
            .ok_or_else(|| format!("Unknown deck format: {}", s))
    }
}

/// One card line of a parsed deck list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardEntry {
    /// Name as written in the export, quantity prefix removed
    pub raw_name: String,
    pub quantity: u32,
    pub explicit_commander_marker: bool,
}

impl CardEntry {
    pub fn new(raw_name: impl Into<String>, quantity: u32) -> Self {
        Self {
            raw_name: raw_name.into(),
            quantity: quantity.max(1),
            explicit_commander_marker: false,
        }
    }

    pub fn commander(raw_name: impl Into<String>) -> Self {
        Self {
            explicit_commander_marker: true,
            ..Self::new(raw_name, 1)
        }
    }
}

/// Output of a dialect parser
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedDeck {
    /// Canonical name of the commander, when the dialect names exactly one
    pub commander_name: Option<String>,
    /// True when `commander_name` came from the first-quantity-1 rule rather than a marker
    pub commander_inferred: bool,
    /// Non-commander entries in input order
    pub entries: Vec<CardEntry>,
    pub format: FormatTag,
    /// Commander the first-card rule would have picked when an explicit marker chose another
    pub commander_conflict: Option<String>,
    /// Index in `entries` before which an inferred commander's line stood
    pub commander_index: Option<usize>,
}

impl ParsedDeck {
    pub fn new(format: FormatTag) -> Self {
        Self {
            commander_name: None,
            commander_inferred: false,
            entries: Vec::new(),
            format,
            commander_conflict: None,
            commander_index: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.commander_name.is_none() && self.entries.is_empty()
    }
}

/// Ladder step that produced a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStep {
    Cache,
    Exact,
    Variant,
    Fuzzy,
}

/// A card that could not be matched against the card database
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnresolvedCard {
    pub raw_name: String,
    pub quantity: u32,
    pub reason: String,
    pub suggestion: Option<String>,
    /// Line carried an explicit commander marker
    pub was_commander: bool,
}

/// Result of resolving one card entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ResolutionOutcome {
    Resolved {
        record: CardRecord,
        quantity: u32,
        suggestion: Option<String>,
        step: ResolutionStep,
    },
    Unresolved(UnresolvedCard),
}

impl ResolutionOutcome {
    pub fn is_resolved(&self) -> bool {
        matches!(self, ResolutionOutcome::Resolved { .. })
    }

    pub fn suggestion(&self) -> Option<&str> {
        match self {
            ResolutionOutcome::Resolved { suggestion, .. } => suggestion.as_deref(),
            ResolutionOutcome::Unresolved(card) => card.suggestion.as_deref(),
        }
    }
}

/// A resolved main-deck card with its copy count
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeckCard {
    pub record: CardRecord,
    pub quantity: u32,
}

/// Counters describing one import
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    pub total_entries: usize,
    pub resolved: usize,
    pub unresolved: usize,
    pub cache_hits: usize,
    pub fuzzy_matches: usize,
    pub total_cards: u32,
}

/// Final output of one import
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportResult {
    pub commander: Option<CardRecord>,
    pub partners: Vec<CardRecord>,
    pub main_deck: Vec<DeckCard>,
    pub unresolved: Vec<UnresolvedCard>,
    pub suggestions: Vec<String>,
    pub format: FormatTag,
    pub commander_conflict: Option<String>,
    pub stats: ImportStats,
}

impl ImportResult {
    /// An empty result for `format`
    pub fn empty(format: FormatTag) -> Self {
        Self {
            commander: None,
            partners: Vec::new(),
            main_deck: Vec::new(),
            unresolved: Vec::new(),
            suggestions: Vec::new(),
            format,
            commander_conflict: None,
            stats: ImportStats::default(),
        }
    }

    /// Cards in the 99 plus the command zone
    pub fn total_cards(&self) -> u32 {
        let commanders = self.commander.iter().count() + self.partners.len();
        self.main_deck.iter().map(|c| c.quantity).sum::<u32>() + commanders as u32
    }

    /// Number of distinct resolved cards, commanders included
    pub fn resolved_count(&self) -> usize {
        self.main_deck.len() + self.commander.iter().count() + self.partners.len()
    }

    /// Shape handed to the deck-persistence layer
    pub fn to_deck_export(&self) -> DeckExport {
        let mut card_categories: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for card in &self.main_deck {
            card_categories
                .entry(primary_category(card.record.front_type_line()).to_string())
                .or_default()
                .push(card.record.name.clone());
        }

        DeckExport {
            commander: self.commander.as_ref().map(|c| c.name.clone()),
            partners: self.partners.iter().map(|c| c.name.clone()).collect(),
            cards: self
                .main_deck
                .iter()
                .map(|c| ExportedCard {
                    id: c.record.id.clone(),
                    name: c.record.name.clone(),
                    quantity: c.quantity,
                    image_url: c.record.image_url().map(str::to_string),
                })
                .collect(),
            card_categories,
        }
    }
}

/// Deck as stored by the persistence layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckExport {
    pub commander: Option<String>,
    pub partners: Vec<String>,
    pub cards: Vec<ExportedCard>,
    pub card_categories: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedCard {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    /// Front-face image, for double-faced cards too
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Deck-building category for a type line; lands and creatures win over artifact/enchantment
pub fn primary_category(type_line: &str) -> &'static str {
    const ORDER: [(&str, &str); 8] = [
        ("Land", "Lands"),
        ("Creature", "Creatures"),
        ("Planeswalker", "Planeswalkers"),
        ("Battle", "Battles"),
        ("Instant", "Instants"),
        ("Sorcery", "Sorceries"),
        ("Artifact", "Artifacts"),
        ("Enchantment", "Enchantments"),
    ];
    ORDER
        .iter()
        .find(|(needle, _)| type_line.contains(needle))
        .map(|(_, category)| *category)
        .unwrap_or("Other")
}

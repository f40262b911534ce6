//! Fallback commander detection for decks whose dialect named no single commander.

use log::debug;
use mtg_common::CardRecord;

use crate::models::DeckCard;

/// A resolved card in original input order, with its dialect marker
#[derive(Debug, Clone, Copy)]
pub struct CommanderCandidate<'a> {
    pub record: &'a CardRecord,
    pub explicit_marker: bool,
}

impl<'a> From<&'a CardRecord> for CommanderCandidate<'a> {
    fn from(record: &'a CardRecord) -> Self {
        Self {
            record,
            explicit_marker: false,
        }
    }
}

/// Chosen commander and any partners
#[derive(Debug, Clone, PartialEq)]
pub struct CommanderPick {
    pub commander: CardRecord,
    pub partners: Vec<CardRecord>,
}

impl CommanderPick {
    fn single(record: &CardRecord) -> Self {
        Self {
            commander: record.clone(),
            partners: Vec::new(),
        }
    }

    fn pair(first: &CardRecord, second: &CardRecord) -> Self {
        Self {
            commander: first.clone(),
            partners: vec![second.clone()],
        }
    }

    /// Commander followed by partners
    pub fn all(&self) -> impl Iterator<Item = &CardRecord> {
        std::iter::once(&self.commander).chain(self.partners.iter())
    }
}

fn type_line(record: &CardRecord) -> &str {
    record.front_type_line()
}

pub fn is_legendary(record: &CardRecord) -> bool {
    type_line(record).contains("Legendary")
}

pub fn is_creature(record: &CardRecord) -> bool {
    type_line(record).contains("Creature")
}

fn is_vehicle(record: &CardRecord) -> bool {
    type_line(record).contains("Vehicle")
}

fn is_legendary_creature(record: &CardRecord) -> bool {
    is_legendary(record) && is_creature(record)
}

/// "partner", "partner with", "choose a background", "friends forever"
pub fn is_partner_capable(record: &CardRecord) -> bool {
    let text = record.full_oracle_text().to_lowercase();
    text.contains("partner") || text.contains("choose a background") || text.contains("friends forever")
}

/// Legendary creature, planeswalker that can be your commander, or legendary vehicle
pub fn is_commander_eligible(record: &CardRecord) -> bool {
    let planeswalker_commander = type_line(record).contains("Planeswalker")
        && record
            .full_oracle_text()
            .to_lowercase()
            .contains("can be your commander");
    let legendary_vehicle = is_legendary(record)
        && type_line(record).contains("Artifact")
        && is_vehicle(record);
    is_legendary_creature(record) || planeswalker_commander || legendary_vehicle
}

fn exactly_one<'a>(records: &[&'a CardRecord]) -> Option<&'a CardRecord> {
    match records {
        [only] => Some(*only),
        _ => None,
    }
}

fn partner_pair<'a>(records: &[&'a CardRecord]) -> Option<(&'a CardRecord, &'a CardRecord)> {
    match records {
        [a, b] if is_partner_capable(a) && is_partner_capable(b) => Some((*a, *b)),
        _ => None,
    }
}

/// Guess the commander from resolved cards in original input order.
///
/// Cascade: a single marked card (or a marked partner pair); the first card
/// when it is commander-eligible; otherwise the legendary creatures and
/// vehicles, preferring a lone candidate, a partner pair, a lone artifact
/// creature, a lone multicolour creature, then the first legendary creature.
pub fn detect_commander(cards: &[CommanderCandidate<'_>]) -> Option<CommanderPick> {
    let marked: Vec<&CardRecord> = cards
        .iter()
        .filter(|c| c.explicit_marker)
        .map(|c| c.record)
        .collect();
    if let Some(only) = exactly_one(&marked) {
        debug!("Commander from single marker: {}", only.name);
        return Some(CommanderPick::single(only));
    }
    if let Some((a, b)) = partner_pair(&marked) {
        debug!("Partner commanders from markers: {} + {}", a.name, b.name);
        return Some(CommanderPick::pair(a, b));
    }

    if let Some(first) = cards.first() {
        if is_commander_eligible(first.record) {
            debug!("Commander from first card: {}", first.record.name);
            return Some(CommanderPick::single(first.record));
        }
    }

    let pool: Vec<&CardRecord> = cards
        .iter()
        .map(|c| c.record)
        .filter(|r| is_legendary(r) && (is_creature(r) || is_vehicle(r)))
        .collect();

    if let Some(only) = exactly_one(&pool) {
        return Some(CommanderPick::single(only));
    }
    if let Some((a, b)) = partner_pair(&pool) {
        return Some(CommanderPick::pair(a, b));
    }

    let artifact_creatures: Vec<&CardRecord> = pool
        .iter()
        .copied()
        .filter(|r| is_creature(r) && type_line(r).contains("Artifact"))
        .collect();
    if let Some(only) = exactly_one(&artifact_creatures) {
        return Some(CommanderPick::single(only));
    }

    let multicolor: Vec<&CardRecord> = pool
        .iter()
        .copied()
        .filter(|r| is_creature(r) && r.color_identity.len() >= 2)
        .collect();
    if let Some(only) = exactly_one(&multicolor) {
        return Some(CommanderPick::single(only));
    }

    pool.into_iter()
        .find(|r| is_legendary_creature(r))
        .map(CommanderPick::single)
}

/// Drop every main-deck card that is now in the command zone
pub fn remove_commanders(main_deck: &mut Vec<DeckCard>, commanders: &[&CardRecord]) {
    main_deck.retain(|card| !commanders.iter().any(|c| c.id == card.record.id));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{alesha, artifact, card, legendary_creature};
    use mtg_common::Color;

    fn candidates(records: &[CardRecord]) -> Vec<CommanderCandidate<'_>> {
        records.iter().map(CommanderCandidate::from).collect()
    }

    fn partner(name: &str) -> CardRecord {
        card(name, "Legendary Creature — Human", "Partner", &[Color::Blue])
    }

    #[test]
    fn first_legendary_creature_wins() {
        let records = vec![alesha(), artifact("Sol Ring")];
        let pick = detect_commander(&candidates(&records)).unwrap();

        assert_eq!(pick.commander.name, "Alesha, Who Smiles at Death");
        assert!(pick.partners.is_empty());
    }

    #[test]
    fn empty_or_non_legendary_is_none() {
        assert!(detect_commander(&[]).is_none());

        let records = vec![artifact("Sol Ring"), card("Llanowar Elves", "Creature — Elf Druid", "", &[Color::Green])];
        assert!(detect_commander(&candidates(&records)).is_none());
    }

    #[test]
    fn single_marker_beats_first_card() {
        let records = vec![legendary_creature("Krenko, Mob Boss", &[Color::Red]), artifact("Sol Ring")];
        let mut input = candidates(&records);
        input[1].explicit_marker = true;

        let pick = detect_commander(&input).unwrap();
        assert_eq!(pick.commander.name, "Sol Ring");
    }

    #[test]
    fn two_marked_partners() {
        let records = vec![artifact("Sol Ring"), partner("Thrasios, Triton Hero"), partner("Tymna the Weaver")];
        let mut input = candidates(&records);
        input[1].explicit_marker = true;
        input[2].explicit_marker = true;

        let pick = detect_commander(&input).unwrap();
        assert_eq!(pick.commander.name, "Thrasios, Triton Hero");
        assert_eq!(pick.partners[0].name, "Tymna the Weaver");
    }

    #[test]
    fn planeswalker_commander_and_vehicle_count_as_first_card() {
        let walker = card(
            "Teferi, Temporal Archmage",
            "Legendary Planeswalker — Teferi",
            "Teferi, Temporal Archmage can be your commander.",
            &[Color::Blue],
        );
        let records = vec![walker, artifact("Sol Ring")];
        assert_eq!(
            detect_commander(&candidates(&records)).unwrap().commander.name,
            "Teferi, Temporal Archmage"
        );

        let vehicle = card("Parhelion II", "Legendary Artifact — Vehicle", "Flying", &[Color::White]);
        let records = vec![vehicle, artifact("Sol Ring")];
        assert_eq!(
            detect_commander(&candidates(&records)).unwrap().commander.name,
            "Parhelion II"
        );
    }

    #[test]
    fn lone_legend_found_anywhere() {
        let records = vec![artifact("Sol Ring"), artifact("Arcane Signet"), alesha()];
        assert_eq!(
            detect_commander(&candidates(&records)).unwrap().commander.name,
            "Alesha, Who Smiles at Death"
        );
    }

    #[test]
    fn unmarked_partner_pair_found_in_scan() {
        let records = vec![artifact("Sol Ring"), partner("Thrasios, Triton Hero"), partner("Tymna the Weaver")];
        let pick = detect_commander(&candidates(&records)).unwrap();

        assert_eq!(pick.all().count(), 2);
    }

    #[test]
    fn priority_artifact_creature_then_multicolor_then_first() {
        let golem = card("Karn, Silver Golem", "Legendary Artifact Creature — Golem", "", &[]);
        let records = vec![
            artifact("Sol Ring"),
            legendary_creature("Krenko, Mob Boss", &[Color::Red]),
            golem,
            legendary_creature("Atraxa, Praetors' Voice", &[Color::White, Color::Blue, Color::Black, Color::Green]),
        ];
        assert_eq!(
            detect_commander(&candidates(&records)).unwrap().commander.name,
            "Karn, Silver Golem"
        );

        let records = vec![
            artifact("Sol Ring"),
            legendary_creature("Krenko, Mob Boss", &[Color::Red]),
            legendary_creature("Atraxa, Praetors' Voice", &[Color::White, Color::Blue, Color::Black, Color::Green]),
        ];
        assert_eq!(
            detect_commander(&candidates(&records)).unwrap().commander.name,
            "Atraxa, Praetors' Voice"
        );

        let records = vec![
            artifact("Sol Ring"),
            legendary_creature("Krenko, Mob Boss", &[Color::Red]),
            legendary_creature("Isamaru, Hound of Konda", &[Color::White]),
        ];
        assert_eq!(
            detect_commander(&candidates(&records)).unwrap().commander.name,
            "Krenko, Mob Boss"
        );
    }

    #[test]
    fn remove_commanders_drops_matching_ids() {
        let mut deck = vec![
            DeckCard { record: alesha(), quantity: 1 },
            DeckCard { record: artifact("Sol Ring"), quantity: 1 },
        ];
        let commander = alesha();
        remove_commanders(&mut deck, &[&commander]);

        assert_eq!(deck.len(), 1);
        assert_eq!(deck[0].record.name, "Sol Ring");
    }
}

use serde::Serialize;

use crate::models::ImportResult;

/// Conventional card-count band for a commander deck
pub const MIN_DECK_CARDS: u32 = 50;
pub const MAX_DECK_CARDS: u32 = 100;

/// Blocking errors and non-blocking warnings for an import result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

pub fn validate(result: &ImportResult) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if result.commander.is_none() {
        errors.push("No commander found in deck list".to_string());
    }
    if result.resolved_count() == 0 {
        errors.push("No cards could be resolved".to_string());
    }

    if !result.unresolved.is_empty() {
        let names: Vec<&str> = result
            .unresolved
            .iter()
            .map(|card| card.raw_name.as_str())
            .collect();
        warnings.push(format!(
            "{} card(s) could not be resolved: {}",
            names.len(),
            names.join(", ")
        ));
    }
    warnings.extend(result.suggestions.iter().cloned());

    let total = result.total_cards();
    if total < MIN_DECK_CARDS {
        warnings.push(format!("Deck has {} cards, fewer than {}", total, MIN_DECK_CARDS));
    } else if total > MAX_DECK_CARDS {
        warnings.push(format!("Deck has {} cards, more than {}", total, MAX_DECK_CARDS));
    }

    if let (Some(conflict), Some(commander)) = (&result.commander_conflict, &result.commander) {
        warnings.push(format!(
            "Commander marked as \"{}\" but the first-card rule would have picked \"{}\"",
            commander.name, conflict
        ));
    }

    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
        warnings,
    }
}

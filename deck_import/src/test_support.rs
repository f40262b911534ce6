//! In-memory card database and record builders for unit tests.

use async_trait::async_trait;
use mtg_common::{CardDatabase, CardRecord, Color, ScryfallError, ScryfallResult};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

pub fn card(name: &str, type_line: &str, oracle_text: &str, colors: &[Color]) -> CardRecord {
    CardRecord {
        id: format!("id-{}", name.to_lowercase().replace(' ', "-")),
        name: name.to_string(),
        type_line: Some(type_line.to_string()),
        oracle_text: Some(oracle_text.to_string()),
        color_identity: colors.to_vec(),
        image_uris: None,
        card_faces: None,
    }
}

pub fn artifact(name: &str) -> CardRecord {
    card(name, "Artifact", "", &[])
}

pub fn legendary_creature(name: &str, colors: &[Color]) -> CardRecord {
    card(name, "Legendary Creature — Human", "", colors)
}

pub fn alesha() -> CardRecord {
    card(
        "Alesha, Who Smiles at Death",
        "Legendary Creature — Human Warrior",
        "First strike\nWhenever Alesha, Who Smiles at Death attacks, you may pay {W/B}{W/B}.",
        &[Color::White, Color::Black, Color::Red],
    )
}

/// Card database over a fixed list, counting calls
#[derive(Debug, Default)]
pub struct StubDatabase {
    cards: Vec<CardRecord>,
    failing: AtomicBool,
    pub exact_calls: AtomicUsize,
    pub search_calls: AtomicUsize,
}

impl StubDatabase {
    pub fn new(cards: Vec<CardRecord>) -> Self {
        Self {
            cards,
            ..Self::default()
        }
    }

    /// Make every lookup fail like an unreachable service
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn total_calls(&self) -> usize {
        self.exact_calls.load(Ordering::SeqCst) + self.search_calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> ScryfallResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ScryfallError::ApiResponse {
                code: "unavailable".to_string(),
                details: "Service unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CardDatabase for StubDatabase {
    async fn search_exact(&self, name: &str) -> ScryfallResult<Vec<CardRecord>> {
        self.exact_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self
            .cards
            .iter()
            .filter(|c| {
                c.name.eq_ignore_ascii_case(name) || c.front_face_name().eq_ignore_ascii_case(name)
            })
            .cloned()
            .collect())
    }

    async fn search(&self, query: &str) -> ScryfallResult<Vec<CardRecord>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let query = query.to_lowercase();
        Ok(self
            .cards
            .iter()
            .filter(|c| c.name.to_lowercase().contains(&query))
            .cloned()
            .collect())
    }
}

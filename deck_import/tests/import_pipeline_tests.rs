//! End-to-end imports against a mocked Scryfall API.

use deck_import::{
    validate, CardCache, DeckImporter, FormatTag, ImportConfig, ProgressSink, ResolutionStep,
};
use mtg_common::ScryfallClient;
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ALESHA: &str = "Alesha, Who Smiles at Death";

fn card_json(name: &str, type_line: &str, colors: &[&str]) -> serde_json::Value {
    serde_json::json!({
        "id": format!("id-{}", name.to_lowercase().replace(' ', "-")),
        "name": name,
        "type_line": type_line,
        "oracle_text": "",
        "color_identity": colors,
    })
}

fn list_json(cards: Vec<serde_json::Value>) -> serde_json::Value {
    serde_json::json!({ "object": "list", "has_more": false, "data": cards })
}

async fn mount_search(server: &MockServer, query: &str, cards: Vec<serde_json::Value>) {
    Mock::given(method("GET"))
        .and(path("/cards/search"))
        .and(query_param("q", query))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_json(cards)))
        .mount(server)
        .await;
}

/// Scryfall stand-in knowing Alesha, Sol Ring and Command Tower
async fn scryfall() -> MockServer {
    let server = MockServer::start().await;
    let alesha = card_json(ALESHA, "Legendary Creature — Human Warrior", &["W", "B", "R"]);
    let sol_ring = card_json("Sol Ring", "Artifact", &[]);
    let talisman = card_json("Sol Talisman", "Artifact", &[]);
    let tower = card_json("Command Tower", "Land", &[]);

    mount_search(&server, &format!("!\"{ALESHA}\""), vec![alesha]).await;
    mount_search(&server, "!\"Sol Ring\"", vec![sol_ring.clone()]).await;
    mount_search(&server, "!\"Command Tower\"", vec![tower]).await;
    mount_search(&server, "Sol", vec![talisman, sol_ring]).await;
    server
}

fn importer(server: &MockServer, cache: Arc<CardCache>) -> DeckImporter<ScryfallClient> {
    let client = ScryfallClient::with_base_url(server.uri());
    DeckImporter::new(client, cache, &ImportConfig::unpaced())
}

#[tokio::test]
async fn moxfield_deck_end_to_end() {
    let server = scryfall().await;
    let importer = importer(&server, Arc::new(CardCache::new()));

    let result = importer
        .import(
            "Commander: Alesha, Who Smiles at Death\n\nMain:\n1 Sol Ring\n1 Command Tower",
            &ProgressSink::none(),
        )
        .await
        .unwrap();

    assert_eq!(result.format, FormatTag::Moxfield);
    assert_eq!(result.commander.as_ref().unwrap().name, ALESHA);
    assert_eq!(result.main_deck.len(), 2);
    assert!(result.main_deck.iter().all(|c| c.quantity == 1));

    let report = validate(&result);
    assert!(report.is_valid);
    assert!(report.warnings.iter().any(|w| w.contains("fewer than 50")));

    let export = result.to_deck_export();
    assert_eq!(export.commander.as_deref(), Some(ALESHA));
    assert_eq!(export.card_categories["Lands"], vec!["Command Tower"]);
}

#[tokio::test]
async fn edhrec_typo_is_corrected() {
    let server = scryfall().await;
    let importer = importer(&server, Arc::new(CardCache::new()));

    let result = importer
        .import(
            "1x Alesha, Who Smiles at Death *CMDR*\n1x Sol Rng",
            &ProgressSink::none(),
        )
        .await
        .unwrap();

    assert_eq!(result.format, FormatTag::Edhrec);
    assert_eq!(result.commander.as_ref().unwrap().name, ALESHA);
    assert_eq!(result.main_deck[0].record.name, "Sol Ring");
    assert!(result.suggestions[0].contains("Sol Ring"));
    assert_eq!(result.stats.fuzzy_matches, 1);

    let repeat = importer.resolver().resolve("Sol Rng").await;
    assert_eq!(repeat.step, Some(ResolutionStep::Cache));
}

#[tokio::test]
async fn persisted_cache_serves_a_later_run() {
    let dir = tempfile::tempdir().unwrap();
    let cache_path = dir.path().join("card_cache.json");
    let text = "1x Alesha, Who Smiles at Death *CMDR*\n1x Sol Ring\n1x Command Tower";

    let server = scryfall().await;
    let cache = Arc::new(CardCache::new());
    importer(&server, Arc::clone(&cache))
        .import(text, &ProgressSink::none())
        .await
        .unwrap();
    cache.save(&cache_path).unwrap();

    // Knows no cards at all
    let offline = MockServer::start().await;
    let result = importer(&offline, Arc::new(CardCache::load(&cache_path)))
        .import(text, &ProgressSink::none())
        .await
        .unwrap();

    assert_eq!(result.stats.cache_hits, 3);
    assert!(result.unresolved.is_empty());
    assert!(offline.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn service_outage_leaves_cards_unresolved() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = importer(&server, Arc::new(CardCache::new()))
        .import(
            "1x Alesha, Who Smiles at Death *CMDR*\n1x Sol Ring",
            &ProgressSink::none(),
        )
        .await
        .unwrap();

    assert!(result.commander.is_none());
    assert_eq!(result.unresolved.len(), 2);
    assert!(result.unresolved[0].was_commander);

    let report = validate(&result);
    assert!(!report.is_valid);
    assert_eq!(report.errors.len(), 2);
}

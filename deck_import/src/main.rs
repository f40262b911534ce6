//! Deck Import - Commander deck-list importer
//!
//! Reads a deck list exported by any supported deck builder, resolves every
//! card against Scryfall and prints the resulting deck with its validation
//! report.

use clap::Parser;
use deck_import::{
    validate, CardCache, DeckImporter, FormatTag, ImportConfig, ImportResult, ImportStage,
    ProgressSink, ValidationReport,
};
use mtg_common::ScryfallClient;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncReadExt;

/// Import a Commander deck list and resolve its cards on Scryfall
#[derive(Parser, Debug)]
#[command(name = "deck_import")]
#[command(version, about, long_about = None)]
struct Args {
    /// Deck list file, or "-" to read from stdin
    #[arg(default_value = "-")]
    input: String,

    /// Parse as this dialect instead of detecting it
    /// (moxfield, edhrec, archidekt, tappedout, mtggoldfish, mtga, mtgo, generic)
    #[arg(short, long)]
    format: Option<FormatTag>,

    /// Print the result as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Cards resolved per batch
    #[arg(long)]
    batch_size: Option<usize>,

    /// Pause between two card lookups, in milliseconds
    #[arg(long)]
    card_delay_ms: Option<u64>,

    /// Pause between two batches, in milliseconds
    #[arg(long)]
    batch_delay_ms: Option<u64>,

    /// Scryfall API base URL
    #[arg(long)]
    api_url: Option<String>,

    /// Card cache file (default: ~/.cache/deck_import/card_cache.json)
    #[arg(long)]
    cache_file: Option<PathBuf>,

    /// Keep the card cache in memory only
    #[arg(long, default_value_t = false)]
    no_cache: bool,
}

impl Args {
    fn config(&self) -> ImportConfig {
        let defaults = ImportConfig::default();
        ImportConfig {
            batch_size: self.batch_size.unwrap_or(defaults.batch_size),
            card_delay_ms: self.card_delay_ms.unwrap_or(defaults.card_delay_ms),
            batch_delay_ms: self.batch_delay_ms.unwrap_or(defaults.batch_delay_ms),
            api_base_url: self.api_url.clone().unwrap_or(defaults.api_base_url),
            cache_path: if self.no_cache {
                None
            } else {
                self.cache_file.clone().or(defaults.cache_path)
            },
        }
    }
}

async fn read_input(input: &str) -> std::io::Result<String> {
    if input == "-" {
        let mut text = String::new();
        tokio::io::stdin().read_to_string(&mut text).await?;
        Ok(text)
    } else {
        tokio::fs::read_to_string(input).await
    }
}

#[tokio::main]
async fn main() {
    // Initialize logger. Set RUST_LOG environment variable to control log level.
    // Examples: RUST_LOG=info, RUST_LOG=deck_import=debug
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.config();

    let text = match read_input(&args.input).await {
        Ok(text) => text,
        Err(e) => {
            log::error!("Failed to read {}: {}", args.input, e);
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let cache = Arc::new(match &config.cache_path {
        Some(path) => CardCache::load(path),
        None => CardCache::new(),
    });
    let client = ScryfallClient::with_base_url(config.api_base_url.clone());
    let importer = DeckImporter::new(client, Arc::clone(&cache), &config);

    let (progress, mut events) = ProgressSink::channel();
    let reporter = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event.stage {
                ImportStage::Resolving => log::debug!(
                    "[{:>3}%] {}/{} {}",
                    event.percent,
                    event.current,
                    event.total,
                    event.card_name.unwrap_or_default()
                ),
                stage => log::info!("[{:>3}%] {:?}", event.percent, stage),
            }
        }
    });

    let outcome = match args.format {
        Some(format) => importer.import_as(&text, format, &progress).await,
        None => importer.import(&text, &progress).await,
    };
    drop(progress);
    if let Err(e) = reporter.await {
        log::warn!("Progress reporter stopped: {}", e);
    }

    if let Some(path) = &config.cache_path {
        if let Err(e) = cache.save(path) {
            log::warn!("Failed to save card cache to {}: {}", path.display(), e);
        }
    }

    let result = match outcome {
        Ok(result) => result,
        Err(e) => {
            log::error!("Import failed: {e}");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    let report = validate(&result);

    if args.json {
        print_json(&result, &report);
    } else {
        print_text(&result, &report);
    }

    if !report.is_valid {
        std::process::exit(2);
    }
}

fn print_json(result: &ImportResult, report: &ValidationReport) {
    let output = serde_json::json!({
        "format": result.format,
        "deck": result.to_deck_export(),
        "unresolved": result.unresolved,
        "suggestions": result.suggestions,
        "commander_conflict": result.commander_conflict,
        "stats": result.stats,
        "validation": report,
    });
    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            log::error!("Failed to serialize result: {e}");
            std::process::exit(1);
        }
    }
}

fn print_text(result: &ImportResult, report: &ValidationReport) {
    println!("Format: {}", result.format);
    match &result.commander {
        Some(commander) => println!("Commander: {}", commander.name),
        None => println!("Commander: (none)"),
    }
    for partner in &result.partners {
        println!("Partner: {}", partner.name);
    }

    println!();
    for card in &result.main_deck {
        println!("{} {}", card.quantity, card.record.name);
    }

    if !result.unresolved.is_empty() {
        println!();
        println!("Unresolved:");
        for card in &result.unresolved {
            match &card.suggestion {
                Some(hint) => println!("  {} {} - {}", card.quantity, card.raw_name, hint),
                None => println!("  {} {}", card.quantity, card.raw_name),
            }
        }
    }

    println!();
    println!(
        "{} cards, {} resolved, {} unresolved ({} from cache, {} corrected)",
        result.stats.total_cards,
        result.stats.resolved,
        result.stats.unresolved,
        result.stats.cache_hits,
        result.stats.fuzzy_matches
    );
    for error in &report.errors {
        println!("Error: {error}");
    }
    for warning in &report.warnings {
        println!("Warning: {warning}");
    }
}

//! Scripted demo of the todo engine.
//!
//! Opens the file-backed engine named by the environment (`.env` is
//! honored), plays a short session and prints the visible list after each
//! step. Running it again shows the list restored from the previous run.

use anyhow::Context;
use todo::{Config, Filter, TodoEngine};
use todo_engine_core::storage::KeyValueStorage;
use todo_engine_runtime::metrics::MetricsRecorder;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Missing .env is fine; the environment alone is enough.
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "todo=debug,todo_engine_runtime=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!(?config, "Starting todo demo");

    let mut recorder = MetricsRecorder::new();
    if config.print_metrics {
        recorder.install().context("installing metrics recorder")?;
    }

    println!("=== Todo Demo ===\n");

    let mut engine = TodoEngine::open(&config)
        .with_context(|| format!("opening todo storage in {}", config.storage_dir.display()))?;
    print_list("Restored", &engine);

    println!("\nAdding items...");
    for text in ["write documentation", "buy milk", "deploy to production"] {
        engine.set_input_text(text)?;
        engine.submit_input()?;
    }
    print_list("After adding", &engine);

    let done = engine
        .state()
        .items
        .iter()
        .find(|item| item.text == "buy milk")
        .map(|item| item.id.clone())
        .context("submitted item missing from list")?;
    println!("\nCompleting 'buy milk'...");
    engine.set_completion(done, true)?;
    print_list("After completing", &engine);

    for filter in [Filter::Active, Filter::Completed, Filter::All] {
        println!("\nShowing {filter}...");
        engine.set_filter(filter)?;
        print_list(filter.as_str(), &engine);
    }

    println!("\nState saved in {}", config.storage_dir.display());

    if let Some(text) = recorder.render() {
        println!("\n=== Metrics ===\n{text}");
    }

    println!("\n=== Demo Complete ===");
    Ok(())
}

fn print_list<K: KeyValueStorage>(label: &str, engine: &TodoEngine<K>) {
    println!("{label}: {} of {} visible", engine.visible_count(), engine.item_count());
    for item in engine.visible_items() {
        let status = if engine.is_completed(&item.id) { "✓" } else { " " };
        println!("  [{status}] {} ({})", item.text, item.id);
    }
}

//! Dark City, Shining Babel engine - event replay.
//!
//! Usage: `babel-engine <sheet.json> <events.json> [dice.json]`
//!
//! Loads a sheet (a JSON object of field values), runs the event script
//! through the dispatcher and prints the resulting fields and rolls. Dice
//! come from `dice.json` (an array of rolls, each an array of faces) when
//! given, otherwise they are rolled locally.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use babel_engine::api::SheetEvent;
use babel_engine::infrastructure::catalogue::load_catalogue;
use babel_engine::infrastructure::config::EngineConfig;
use babel_engine::infrastructure::dice::RandomRoller;
use babel_engine::infrastructure::memory::{InMemorySheet, ScriptedRoller};
use babel_engine::infrastructure::ports::RollPort;
use babel_engine::App;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "babel_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (Some(sheet_path), Some(events_path)) = (args.first(), args.get(1)) else {
        anyhow::bail!("usage: babel-engine <sheet.json> <events.json> [dice.json]");
    };

    let config = EngineConfig::from_env();
    tracing::info!(?config, "Starting replay");

    let catalogue = load_catalogue(config.catalogue_path.as_deref())?;
    let sheet = Arc::new(InMemorySheet::from_fields(read_sheet(Path::new(sheet_path))?));
    let events: Vec<SheetEvent> = read_json(Path::new(events_path))?;

    let roller: Arc<dyn RollPort> = match args.get(2) {
        Some(dice_path) => {
            let script: Vec<Vec<u8>> = read_json(Path::new(dice_path))?;
            Arc::new(ScriptedRoller::new(script))
        }
        None => Arc::new(RandomRoller::new()),
    };

    let app = App::new(&config, catalogue, sheet.clone(), roller);

    let mut rolls = Vec::new();
    for event in events {
        let outcome = app.dispatcher.dispatch(event).await?;
        rolls.extend(outcome.rolls.into_iter().map(|roll| {
            serde_json::json!({
                "roll_id": roll.roll_id.as_str(),
                "kind": roll.kind.as_str(),
                "roll": roll.roll_string,
                "label": roll.label,
                "fields": roll.fields,
            })
        }));
    }

    let report = serde_json::json!({
        "fields": sheet.fields(),
        "rolls": rolls,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Sheet files may hold numbers and booleans; the host stores strings.
fn read_sheet(path: &Path) -> anyhow::Result<HashMap<String, String>> {
    let raw: HashMap<String, serde_json::Value> = read_json(path)?;
    Ok(raw
        .into_iter()
        .map(|(name, value)| {
            let text = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Bool(b) => if b { "1" } else { "0" }.to_string(),
                serde_json::Value::Null => String::new(),
                other => other.to_string(),
            };
            (name, text)
        })
        .collect())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
    let _ = dotenvy::dotenv();
}

//! Headless host binary for the rando runtime patcher.
//!
//! Starts a run the way the game host would and drives it against an
//! in-memory scene, printing a JSON report of what happened.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `rando-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Start the background catalog parse
//! 4. Start the run with the vanilla placement
//! 5. Drive every placed location through the headless scene
//! 6. Print the report

mod error;
mod headless;

use std::path::Path;

use rando_core::{CatalogLoader, RandoConfig, Session, VanillaPlacement};
use rando_types::{MemoryStore, Signal};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::headless::{HeadlessPrompt, HeadlessScene, ScriptHost};

/// Config file read from the working directory.
const CONFIG_PATH: &str = "rando-config.yaml";

/// Readiness checks before the headless dialogue accepts input.
const PROMPT_DELAY: u32 = 3;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, run start or the script fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration. Logging is configured from it, so this runs first.
    let (config, from_file) = load_config()?;

    // 2. Initialize structured logging.
    init_logging(&config);
    info!("rando-engine starting");
    info!(
        from_file,
        seed = config.run.seed,
        start = config.randomization.start_name,
        randomize_start_items = config.randomization.randomize_start_items,
        "Configuration loaded"
    );

    // 3. Parse the catalog in the background.
    let loader = CatalogLoader::spawn_default();

    // 4. Start the run.
    let mut store = MemoryStore::new_game();
    let mut signals: Vec<Signal> = Vec::new();
    let mut session = Session::start_run(loader, config, &VanillaPlacement, &mut store, &mut signals)
        .await
        .map_err(EngineError::from)?;

    // 5. Drive the run.
    let mut scene = HeadlessScene::with_default_objects()?;
    let mut ui = HeadlessPrompt::new(PROMPT_DELAY);
    let mut host = ScriptHost {
        scene: &mut scene,
        ui: &mut ui,
        store: &mut store,
        signals: &mut signals,
    };
    let report = headless::run_script(&mut session, &mut host)?;

    for pickup in scene.placed() {
        debug!(
            scene = %pickup.scene,
            object = %pickup.name,
            x = pickup.at.x,
            y = pickup.at.y,
            "Spawned pickup"
        );
    }
    info!(
        prompts = ui.shown(),
        signals = signals.len(),
        tracked = session.tracker().len(),
        "Run complete"
    );

    // 6. Print the report.
    let json = serde_json::to_string_pretty(&report).map_err(EngineError::from)?;
    println!("{json}");
    Ok(())
}

/// Initialize `tracing-subscriber`. `RUST_LOG` takes precedence over the
/// configured level.
fn init_logging(config: &RandoConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.as_str()));
    if config.logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

/// Load configuration from `rando-config.yaml`, falling back to defaults
/// when the file does not exist. Also returns whether the file was read.
fn load_config() -> Result<(RandoConfig, bool), EngineError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        let config = RandoConfig::from_file(config_path)?;
        Ok((config, true))
    } else {
        let mut config = RandoConfig::default();
        config.run.apply_env_overrides();
        Ok((config, false))
    }
}

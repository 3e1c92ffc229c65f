//! Replays recorded KNX and HomeKit value changes through a translator.
//!
//! Prints the resulting accessory state and the telegrams that would be
//! sent to the bus as JSON on stdout.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use knx_homekit_bridge::config::BridgeConfig;
use knx_homekit_bridge::registry::TranslatorRegistry;
use knx_homekit_bridge::replay::{ReplayEvent, replay};
use knx_homekit_bridge::service::Service;
use knx_homekit_common::LoggingConfig;

/// Replay KNX/HomeKit value changes through a translator.
#[derive(Parser, Debug)]
#[command(name = "knx-homekit-replay")]
#[command(about = "Replays recorded value changes against one accessory")]
#[command(version)]
struct Args {
    /// Path to configuration file (JSON5 format)
    #[arg(short, long, default_value = "knx-homekit.json5")]
    config: PathBuf,

    /// Path to the recorded events (JSON5 array)
    #[arg(short, long)]
    events: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let registry = TranslatorRegistry::with_defaults();

    // Load configuration
    let config = BridgeConfig::parse_from_file(&args.config)
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;

    // Initialize logging
    let log_config = LoggingConfig {
        level: args
            .log_level
            .clone()
            .unwrap_or_else(|| config.logging.level.clone()),
        format: config.logging.format,
    };
    knx_homekit_common::init_tracing(&log_config)
        .map_err(|e| anyhow::anyhow!("Failed to init tracing: {}", e))?;

    config
        .validate(&registry)
        .with_context(|| format!("Invalid config in {:?}", args.config))?;
    info!("Loaded configuration from {:?}", args.config);

    let events: Vec<ReplayEvent> = knx_homekit_common::load_config(&args.events)
        .with_context(|| format!("Failed to load events from {:?}", args.events))?;

    let mut service = Service::from_config(config.service, &registry)?;
    info!(
        service = %service.name(),
        translator = service.translator().kind(),
        events = events.len(),
        "Replaying events"
    );

    let report = replay(&mut service, &events);
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

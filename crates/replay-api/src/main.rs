//! Scenario Replay - Main Entry Point

use anyhow::Context;
use replay_api::{init_logging, run_server, ReplaySettings};
use std::path::PathBuf;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Optional settings file path as the only argument
    let settings_path = std::env::args().nth(1).map(PathBuf::from);
    let settings =
        ReplaySettings::load(settings_path.as_deref()).context("Failed to load settings")?;

    init_logging(&settings.logging);

    info!("=== Scenario Replay v{} ===", env!("CARGO_PKG_VERSION"));

    run_server(settings).await?;

    Ok(())
}

mod scheduler;

use anyhow::{Context, Result};
use log::{error, info, warn};
use rolimons::{Config, HttpClient};
use scheduler::Scheduler;
use std::path::Path;
use tokio::signal;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<()> {
    common::setup_env();

    let path = rolimons::config_path();
    let config = load_config(&path)?;
    info!(
        "Loaded {} trade ads for player {} from {}",
        config.trade_ads.len(),
        config.player_id,
        path.display()
    );

    let http = HttpClient::new(&config.verification_token)?;
    let token = CancellationToken::new();
    tokio::spawn(stop_on_interrupt(token.clone()));

    Scheduler::new(http, config).run(token).await;
    Ok(())
}

/// The error is reported once, by `main` returning it.
fn load_config(path: &Path) -> Result<Config> {
    Config::load(path).context("Configuration error")
}

async fn stop_on_interrupt(token: CancellationToken) {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for interrupt: {e}");
        return;
    }
    warn!("Script stopped by user");
    token.cancel();
}

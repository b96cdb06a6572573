//! Track reward sidecar
//!
//! Serves the reward evaluator to a simulator harness over stdio.
//! Configuration comes from the environment:
//! - `TRACK_REWARD_CONFIG`: path to a JSON reward config
//! - `TRACK_REWARD_VARIANT`: variant name when no config file is given
//! - `RUST_LOG`: log filter, logs go to stderr

use anyhow::{Context, Result};
use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;
use track_reward_core::{RewardConfig, RewardEvaluator, RewardVariant};
use track_reward_server::RewardServer;

const CONFIG_ENV: &str = "TRACK_REWARD_CONFIG";
const VARIANT_ENV: &str = "TRACK_REWARD_VARIANT";

/// Resolve configuration: config file first, then variant name, then defaults
fn load_config() -> Result<RewardConfig> {
    if let Ok(path) = env::var(CONFIG_ENV) {
        info!("Loading reward config from {}", path);
        return RewardConfig::from_file(&path)
            .with_context(|| format!("{} points at an unusable config", CONFIG_ENV));
    }

    if let Ok(name) = env::var(VARIANT_ENV) {
        let variant: RewardVariant = name
            .parse()
            .with_context(|| format!("Invalid {}", VARIANT_ENV))?;
        return Ok(RewardConfig::for_variant(variant));
    }

    Ok(RewardConfig::default())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; stdout carries the protocol
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config()?;
    info!("Reward variant: {}", config.variant());

    let server = RewardServer::new(RewardEvaluator::new(config));
    server.run_stdio().await?;

    Ok(())
}

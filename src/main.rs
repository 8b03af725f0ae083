//! gallium - chat-bot command dispatcher with a console transport.
//!
//! Reads lines from standard input, runs them through the command layer,
//! and prints replies. Lines are attributed to the configured owner.

mod commands;
mod config;
mod console;
mod frontend;

use std::sync::Arc;

use gallium_cmd::{AmbientArgs, Registry};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::frontend::{Frontend, Inbound};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;
    let config = Arc::new(config);

    let mut registry = Registry::new();
    registry.register_all(commands::all())?;
    let registry = Arc::new(registry);

    info!(
        user_id = %config.bot.user_id,
        owner_id = %config.bot.owner_id,
        commands = registry.len(),
        "Starting gallium"
    );

    let ambient = AmbientArgs::new().with("registry", Arc::clone(&registry));
    let frontend = Frontend::new(Arc::clone(&config), registry, ambient);

    // Console transport: every stdin line is a direct message from the
    // owner.
    let owner = config.bot.owner_id.clone();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let msg = Inbound {
            content: &line,
            author: &owner,
            channel: "console",
            direct: true,
        };
        frontend.on_message(&msg).await;
    }

    info!("Input closed, shutting down");
    Ok(())
}

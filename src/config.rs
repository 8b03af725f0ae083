//! Configuration loading and management.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Bot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Identity and access lists.
    pub bot: BotConfig,
    /// Output limits.
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// Identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// The bot's own user id, matched against addressing mentions.
    pub user_id: String,
    /// User id granted the owner permission level.
    pub owner_id: String,
    /// User ids granted the listed-admin permission level.
    #[serde(default)]
    pub admins: Vec<String>,
}

/// Output limit configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Maximum characters per outgoing message.
    #[serde(default = "default_message_cap")]
    pub message_cap: usize,
}

fn default_message_cap() -> usize {
    gallium_cmd::DEFAULT_MESSAGE_CAP
}

impl Default for LimitsConfig {
    fn default() -> Self {
        LimitsConfig {
            message_cap: default_message_cap(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

// config.rs - Bot Configuration
// Reads the optional botconfig.txt (KEY=VALUE per line) into the process
// environment, then builds `BotConfig` from environment variables.
//
// Recognised keys:
// - DISCORD_TOKEN (or TOKEN) - bot token, required
// - GUILD_ID                 - register commands for this guild only
// - PORT                     - health-check port, defaults to 3000
// - BOT_STATUS               - "watching" presence text

use std::collections::HashMap;
use std::env;
use std::fs;

use serenity::model::id::GuildId;

use crate::commands::registry::RegistrationScope;
use crate::error::{BotError, BotResult};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_STATUS: &str = "for rule breakers";

const CONFIG_PATHS: [&str; 4] = [
    "botconfig.txt",
    "../botconfig.txt",
    "../../botconfig.txt",
    "src/botconfig.txt",
];

const PLACEHOLDER_TOKEN: &str = "YOUR_BOT_TOKEN_HERE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotConfig {
    pub token: String,
    pub scope: RegistrationScope,
    pub port: u16,
    pub status: String,
}

impl BotConfig {
    /// Build the configuration from the process environment.
    pub fn from_env() -> BotResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> BotResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let token = lookup("DISCORD_TOKEN")
            .or_else(|| lookup("TOKEN"))
            .ok_or(BotError::MissingToken)?;
        if token == PLACEHOLDER_TOKEN {
            return Err(BotError::PlaceholderToken);
        }

        let scope = match lookup("GUILD_ID") {
            Some(raw) => {
                let id = raw.parse::<u64>().map_err(|_| BotError::InvalidConfig {
                    key: "GUILD_ID",
                    value: raw.clone(),
                })?;
                RegistrationScope::Guild(GuildId(id))
            }
            None => RegistrationScope::Global,
        };

        let port = match lookup("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| BotError::InvalidConfig {
                key: "PORT",
                value: raw.clone(),
            })?,
            None => DEFAULT_PORT,
        };

        let status = lookup("BOT_STATUS").unwrap_or_else(|| DEFAULT_STATUS.to_string());

        Ok(Self {
            token,
            scope,
            port,
            status,
        })
    }
}

/// Parse `KEY=VALUE` lines, skipping blanks and `#` comments.
pub fn parse_config_lines(content: &str) -> HashMap<String, String> {
    // Remove BOM if present
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut config = HashMap::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            config.insert(key.to_string(), value.trim().to_string());
        }
    }

    config
}

/// Load botconfig.txt from the first location that has one and export its
/// keys into the environment. Variables that are already set win over the
/// file. Returns the path that was used, if any.
pub fn load_config_file() -> Option<&'static str> {
    for config_path in CONFIG_PATHS {
        let Ok(content) = fs::read_to_string(config_path) else {
            continue;
        };

        for (key, value) in parse_config_lines(&content) {
            if env::var_os(&key).is_none() {
                env::set_var(&key, &value);
            }
        }
        return Some(config_path);
    }

    None
}

use std::collections::HashSet;
use std::env;
use std::path::PathBuf;

use crate::error::{Error, Result};

pub const TOKEN_ENV: &str = "DISCORD_BOT_TOKEN";
pub const ADMINS_ENV: &str = "BOT_ADMIN_IDS";
pub const SETTINGS_FILE_ENV: &str = "SETTINGS_FILE";
pub const COMMAND_PREFIX_ENV: &str = "COMMAND_PREFIX";

pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";
pub const DEFAULT_COMMAND_PREFIX: &str = "g!";

#[derive(Debug, Clone)]
pub struct BotConfig {
    // The secret token used for the Discord authentication.
    pub token: String,
    // Users that are allowed to authorize new servers.
    pub admins: HashSet<u64>,
    // A path to the file with the persisted bot state.
    pub settings_path: PathBuf,
    // The prefix for all bot commands (e.g. "g!host").
    pub command_prefix: String,
}

impl BotConfig {
    // Reads the whole configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let token = env::var(TOKEN_ENV)
            .map_err(|_| Error::Configuration(format!("{} is not set", TOKEN_ENV)))?;

        let raw_admins = env::var(ADMINS_ENV)
            .map_err(|_| Error::Configuration(format!("{} is not set", ADMINS_ENV)))?;
        let admins = parse_admin_ids(&raw_admins)?;

        let settings_path = env::var(SETTINGS_FILE_ENV)
            .unwrap_or_else(|_| DEFAULT_SETTINGS_FILE.to_string())
            .into();
        let command_prefix = env::var(COMMAND_PREFIX_ENV)
            .unwrap_or_else(|_| DEFAULT_COMMAND_PREFIX.to_string());

        Ok(BotConfig {
            token,
            admins,
            settings_path,
            command_prefix,
        })
    }
}

// Parses a comma-separated list of Discord user identifiers.
pub fn parse_admin_ids(value: &str) -> Result<HashSet<u64>> {
    let mut admins = HashSet::new();

    for chunk in value.split(',') {
        let chunk = chunk.trim();
        if chunk.is_empty() {
            continue;
        }

        let user_id = chunk.parse::<u64>().map_err(|_| {
            Error::Configuration(format!("`{}` is not a valid Discord user id", chunk))
        })?;
        admins.insert(user_id);
    }

    match admins.is_empty() {
        true => Err(Error::Configuration(format!(
            "{} does not contain any user ids",
            ADMINS_ENV
        ))),
        false => Ok(admins),
    }
}

//! Configuration management for shrugbot

#[path = "config_tests.rs"]
mod config_tests;

use anyhow::{Context, Result};

/// Source of environment variables, swappable in tests.
pub trait ReadEnv {
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads from the real process environment.
pub struct ProcessEnv;

impl ReadEnv for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Immutable bot settings, validated once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bot token from the Discord developer portal.
    pub api_key: String,
    /// Name of the signature emote to resolve per guild.
    pub emote_name: String,
    /// Usernames whose mentions trigger a response (exact, case-sensitive).
    pub emote_users: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env(env: &impl ReadEnv) -> Result<Self> {
        let api_key = env.var("API_KEY").context("API_KEY not set")?;
        let emote_name = env.var("EMOTE_NAME").context("EMOTE_NAME not set")?;
        let emote_users =
            parse_name_list(&env.var("EMOTE_USERS").context("EMOTE_USERS not set")?);

        if emote_users.is_empty() {
            anyhow::bail!("EMOTE_USERS contains no usernames");
        }

        Ok(Config {
            api_key,
            emote_name,
            emote_users,
        })
    }
}

fn parse_name_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim())
        .filter(|x| !x.is_empty())
        .map(String::from)
        .collect()
}

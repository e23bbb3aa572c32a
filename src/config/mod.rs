//! Typed configuration from environment variables.
//!
//! Loads once at startup, fails fast if required vars are missing.
//! The bot token is wrapped in secrecy::SecretString to prevent log leaks.

pub mod secrets;

use std::path::PathBuf;
use std::str::FromStr;

use crate::auth::CallerId;
use crate::error::{Error, Result};
use secrecy::SecretString;

pub const DEFAULT_DATA_FILE: &str = "data.json";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
pub const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;

#[derive(Debug)]
pub struct Config {
    pub bot_token: SecretString,
    pub admin_id: CallerId,
    pub data_file: PathBuf,
    pub port: u16,
    pub telegram_api_url: String,
    pub poll_timeout_secs: u64,
    pub otel_endpoint: Option<String>,
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In local dev, call `dotenvy::dotenv().ok()` before this.
    /// On the hosting platform, the service environment provides the vars.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let bot_token = required(&var, "BOT_TOKEN")?;
        let admin_id: i64 = parse_var("ADMIN_ID", &required(&var, "ADMIN_ID")?)?;

        Ok(Self {
            bot_token: SecretString::from(bot_token),
            admin_id: CallerId(admin_id),
            data_file: var("DATA_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE)),
            port: match var("PORT") {
                Some(raw) => parse_var("PORT", &raw)?,
                None => DEFAULT_PORT,
            },
            telegram_api_url: var("TELEGRAM_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string()),
            poll_timeout_secs: match var("POLL_TIMEOUT_SECS") {
                Some(raw) => parse_var("POLL_TIMEOUT_SECS", &raw)?,
                None => DEFAULT_POLL_TIMEOUT_SECS,
            },
            otel_endpoint: var("OTEL_ENDPOINT"),
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn required<F>(var: &F, name: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    var(name).ok_or_else(|| Error::Config(format!("required environment variable {name} is not set")))
}

fn parse_var<T: FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| Error::Config(format!("environment variable {name} has an invalid value: {raw}")))
}

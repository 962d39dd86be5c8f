use anyhow::{anyhow, Result};
use std::env;
use std::time::Duration;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/giveaways.db";
const DEFAULT_HTTP_PORT: u16 = 3000;
const DEFAULT_TICK_SECONDS: u64 = 60;
const DEFAULT_SHUTDOWN_GRACE_SECONDS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    pub database_url: String,
    pub http_port: u16,
    pub scheduler_tick: Duration,
    pub shutdown_grace: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let token = env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| anyhow!("TELEGRAM_BOT_TOKEN must be set"))?;

        if token.trim().is_empty() {
            return Err(anyhow!("TELEGRAM_BOT_TOKEN must be set"));
        }

        let http_port = parse_var("HTTP_PORT", DEFAULT_HTTP_PORT)?;

        let tick_seconds = parse_var("SCHEDULER_TICK_SECONDS", DEFAULT_TICK_SECONDS)?;
        if tick_seconds == 0 {
            return Err(anyhow!("SCHEDULER_TICK_SECONDS must be greater than zero"));
        }

        let grace_seconds = parse_var("SHUTDOWN_GRACE_SECONDS", DEFAULT_SHUTDOWN_GRACE_SECONDS)?;

        Ok(Config {
            telegram_bot_token: token,
            database_url: database_url_from_env(),
            http_port,
            scheduler_tick: Duration::from_secs(tick_seconds),
            shutdown_grace: Duration::from_secs(grace_seconds),
        })
    }
}

/// `DATABASE_URL`, falling back to the default SQLite file when unset or blank
pub fn database_url_from_env() -> String {
    env::var("DATABASE_URL")
        .ok()
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string())
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| anyhow!("Invalid {}", name)),
        _ => Ok(default),
    }
}
